//! Fixed vocabularies used by the lexical classifiers. Kept as plain data
//! tables so curriculum-specific tuning never touches the algorithms.

/// Action-verb stems that open a learning-outcome statement.
pub(crate) const OUTCOME_VERBS: &[&str] = &[
    "describe",
    "explain",
    "demonstrate",
    "evaluate",
    "analyze",
    "calculate",
    "compare",
    "contrast",
    "identify",
    "discuss",
    "distinguish",
    "formulate",
    "construct",
    "interpret",
    "recommend",
    "justify",
    "critique",
    "appraise",
    "assess",
];

/// Curated financial terms surfaced as key terms when present in a stage.
/// Order is significant: matches are reported in this order.
pub(crate) const KEY_TERMS: &[&str] = &[
    "efficient frontier",
    "sharpe ratio",
    "treynor ratio",
    "information ratio",
    "tracking error",
    "alpha",
    "beta",
    "duration",
    "convexity",
    "immunization",
    "liability-driven",
    "factor model",
    "mean-variance",
    "Monte Carlo",
    "value at risk",
    "CVaR",
    "behavioral bias",
    "anchoring",
    "framing",
    "prospect theory",
    "momentum",
    "rebalancing",
    "overlay",
    "GIPS",
    "absolute return",
    "relative return",
    "benchmark",
    "attribution",
    "Black-Litterman",
    "ALM",
    "liability matching",
    "futures overlay",
    "currency hedge",
    "carry trade",
    "volatility",
    "correlation",
];

/// Tokens too generic to anchor a reading's start page. Common English words
/// plus terms that appear in nearly every finance reading title. Only tokens
/// of five or more characters matter here; shorter ones are filtered before
/// the stop-word check.
pub(crate) const STOP_WORDS: &[&str] = &[
    "about",
    "above",
    "after",
    "against",
    "among",
    "before",
    "being",
    "between",
    "could",
    "other",
    "should",
    "their",
    "there",
    "these",
    "those",
    "through",
    "under",
    "which",
    "while",
    "within",
    "would",
    "introduction",
    "overview",
    "applications",
    "concepts",
    "principles",
    "portfolio",
    "portfolios",
    "investment",
    "investments",
    "management",
    "analysis",
    "financial",
];

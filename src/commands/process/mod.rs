mod boundary;
mod chunk;
mod classify;
mod curriculum;
mod extract;
mod render;
mod run;
mod stages;
#[cfg(test)]
mod tests;
mod vocab;

pub use run::run;

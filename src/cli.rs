use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "stagegen",
    version,
    about = "Curriculum PDF segmentation and stage-generation tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Process(ProcessArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "pdfs")]
    pub source_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(long, default_value = "content/volumes.json")]
    pub config_path: PathBuf,

    #[arg(long, default_value = "pdfs")]
    pub source_dir: PathBuf,

    #[arg(long, default_value = "content/stages")]
    pub stages_dir: PathBuf,

    #[arg(long, default_value = "content/curriculum.json")]
    pub curriculum_path: PathBuf,

    #[arg(long, default_value = "content/manifests")]
    pub manifest_dir: PathBuf,

    #[arg(long, default_value_t = 2000)]
    pub target_words: usize,

    #[arg(long)]
    pub max_pages_per_doc: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "content/stages")]
    pub stages_dir: PathBuf,

    #[arg(long, default_value = "content/curriculum.json")]
    pub curriculum_path: PathBuf,
}

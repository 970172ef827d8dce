use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-podwatch")]
#[command(about = "List pods, summarize logs of matching pods, then watch pod events")]
pub struct Cli {
    /// Path to the kubeconfig file (defaults to ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// Namespace whose pods get their logs summarized
    #[arg(long, default_value = "p-35v0yfm35f")]
    pub log_namespace: String,

    /// Pod name prefix selecting which pods get their logs summarized
    #[arg(long, default_value = "p-")]
    pub prefix: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The kubeconfig to load: the flag if given, otherwise `<home>/.kube/config`.
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        self.kubeconfig
            .clone()
            .or_else(|| home::home_dir().map(|home| crate::utils::default_kubeconfig(&home)))
    }
}

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global subscriber. Output goes to stderr so it never
/// interleaves with the wizard's own screens on stdout.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Render a key for display: first four characters, the rest as bullets.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    let hidden = key.chars().count().saturating_sub(4);
    format!("{}{}", visible, "•".repeat(hidden))
}

//! Status command implementation

use crate::config::Config;
use crate::flatten::PendingOrderStore;
use crate::screener::AcceptedPairStore;

/// Print accepted-pair and pending-order counts
pub async fn show_status(config: &Config) -> anyhow::Result<()> {
    let pairs = AcceptedPairStore::new(&config.screening.output_path);
    let pending = PendingOrderStore::new(&config.flatten.pending_state_path);

    println!("perp-statarb status");
    match pairs.load().await {
        Ok(accepted) => println!(
            "  Accepted pairs: {} ({})",
            accepted.len(),
            pairs.path().display()
        ),
        Err(e) if e.is_not_found() => {
            println!("  Accepted pairs: none screened yet")
        }
        Err(e) => return Err(e.into()),
    }
    println!(
        "  Pending orders: {} ({})",
        pending.load().await?.len(),
        pending.path().display()
    );
    Ok(())
}

use crate::clock::Clock;
use crate::commands::Out;
use crate::stats::Summary;
use crate::{Config, Result};

/// Shows total spending, spending over the last seven days and the top category.
pub fn stats(config: Config, clock: impl Clock + 'static) -> Result<Out<Summary>> {
    let today = clock.today();
    let settings = config.settings()?;
    let store = config.open_store(clock)?;
    let summary = Summary::of(store.records(), today);
    let currency = settings.base_currency();

    let mut lines = vec![
        format!("Total: {} {currency}", summary.total.to_fixed()),
        format!("Last 7 days: {} {currency}", summary.last_seven_days.to_fixed()),
        match (&summary.top_category, summary.top_category_total) {
            (Some(category), Some(total)) => {
                format!("Top category: {category} ({} {currency})", total.to_fixed())
            }
            _ => "Top category: none".to_string(),
        },
        format!("Transactions: {}", summary.count),
    ];
    if summary.exceeds_cap(settings.spending_cap()) {
        if let Some(cap) = settings.spending_cap() {
            lines.push(format!(
                "Spending cap of {} {currency} exceeded",
                cap.to_fixed()
            ));
        }
    }
    Ok(Out::new(lines.join("\n"), summary))
}

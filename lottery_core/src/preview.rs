//! Human-readable summary of reward actions. Best effort only: anything that
//! does not look like `give <target> <item> <amount>` is left out, and the
//! authoritative action list is never affected.

pub fn preview_action(action: &str) -> Option<String> {
    let mut parts = action.split_whitespace();
    if parts.next()? != "give" {
        return None;
    }
    let _target = parts.next()?;
    let item = parts.next()?;
    let amount: u32 = parts.next().map_or(Ok(1), str::parse).ok()?;
    Some(format!("{item} x {amount}"))
}

/// `None` when no action could be previewed.
pub fn reward_preview<S: AsRef<str>>(actions: &[S]) -> Option<String> {
    let items: Vec<String> = actions
        .iter()
        .filter_map(|a| preview_action(a.as_ref()))
        .collect();
    (!items.is_empty()).then(|| items.join(", "))
}

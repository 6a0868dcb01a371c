use crate::state::Participant;

/// Applies reward actions on behalf of a participant. Actions are opaque to
/// the engine; an executor that cannot handle one skips it.
pub trait RewardExecutor: Send + Sync {
    fn execute(&self, participant: &Participant, actions: &[String]);
}

/// Substitutes `%player_name%` and `%player_id%` in each action.
pub fn expand_placeholders(participant: &Participant, actions: &[String]) -> Vec<String> {
    actions
        .iter()
        .map(|a| {
            a.replace("%player_name%", &participant.name)
                .replace("%player_id%", &participant.id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_placeholders() {
        let p = Participant::new("u-1", "Steve");
        let out = expand_placeholders(
            &p,
            &["give %player_name% diamond 1".into(), "log %player_id%".into(), "plain".into()],
        );
        assert_eq!(out, vec!["give Steve diamond 1", "log u-1", "plain"]);
    }
}

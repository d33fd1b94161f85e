//! Level-up announcements: best-effort, delivered after state is saved.

use anyhow::Result;

use tally_core::{Reward, UserProgress};

/// Delivery seam for level-up announcements. The feed loop calls this
/// only after the snapshot is persisted; a failed delivery is logged and
/// never rolls progression state back.
pub trait Notifier {
    fn announce_level_up(
        &mut self,
        user: &UserProgress,
        new_level: u32,
        reward: &Reward,
    ) -> Result<()>;
}

/// Prints announcements to stdout.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn announce_level_up(
        &mut self,
        user: &UserProgress,
        new_level: u32,
        reward: &Reward,
    ) -> Result<()> {
        println!("{}", render_announcement(user, new_level, reward));
        Ok(())
    }
}

fn render_announcement(user: &UserProgress, new_level: u32, reward: &Reward) -> String {
    let who = if user.username.is_empty() {
        user.user_id.to_string()
    } else {
        user.username.clone()
    };

    let mut line = format!(
        "{who} reached level {new_level}! +{} coin (level reward)",
        reward.per_level_coin
    );
    if !reward.milestones_hit.is_empty() {
        let levels: Vec<String> = reward.milestones_hit.iter().map(|l| l.to_string()).collect();
        line.push_str(&format!(
            ", +{} coin (milestone {})",
            reward.milestone_coin,
            levels.join(", ")
        ));
    }
    line.push_str(&format!(", total +{} coin", reward.total_coin));
    line
}

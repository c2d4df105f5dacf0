use super::by_user;
use crate::stats;
use crate::types::observation::Observation;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user: String,
    pub total_games: usize,
    pub played_games: usize,
    pub played_share: f64,
    pub total_playtime: f64,
    pub mean_playtime: Option<f64>,
    pub median_playtime: Option<f64>,
    pub mean_achievement_ratio: Option<f64>,
}

/// Library statistics per participant. Playtime and achievement figures
/// only consider games with playtime above zero.
pub fn user_stats(observations: &[Observation]) -> Vec<UserStats> {
    by_user(observations)
        .into_iter()
        .map(|(user, games)| {
            let played = games
                .iter()
                .filter(|game| game.is_played())
                .collect::<Vec<_>>();
            let hours = played
                .iter()
                .map(|game| game.playtime_hours)
                .collect::<Vec<_>>();
            let ratios = played
                .iter()
                .filter_map(|game| game.achievement_ratio)
                .collect::<Vec<_>>();

            UserStats {
                user: user.to_string(),
                total_games: games.len(),
                played_games: played.len(),
                played_share: played.len() as f64 / games.len() as f64,
                total_playtime: hours.iter().sum(),
                mean_playtime: stats::mean(&hours),
                median_playtime: stats::median(&hours),
                mean_achievement_ratio: stats::mean(&ratios),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(user: &str, appid: u64, hours: f64, ratio: Option<f64>) -> Observation {
        Observation {
            participant_id: user.to_string(),
            appid,
            playtime_hours: hours,
            achievement_ratio: ratio,
            ..Default::default()
        }
    }

    #[test]
    fn stats_only_count_played_games() {
        let rows = vec![
            game("alice", 1, 10.0, Some(0.5)),
            game("alice", 2, 0.0, Some(1.0)),
            game("alice", 3, 2.0, None),
            game("alice", 4, 6.0, Some(0.25)),
        ];

        let stats = user_stats(&rows);
        assert_eq!(stats.len(), 1);
        let alice = &stats[0];
        assert_eq!(alice.total_games, 4);
        assert_eq!(alice.played_games, 3);
        assert_eq!(alice.played_share, 0.75);
        assert_eq!(alice.total_playtime, 18.0);
        assert_eq!(alice.mean_playtime, Some(6.0));
        assert_eq!(alice.median_playtime, Some(6.0));
        assert_eq!(alice.mean_achievement_ratio, Some(0.375));
    }

    #[test]
    fn users_without_played_games_have_undefined_averages() {
        let stats = user_stats(&[game("bob", 1, 0.0, Some(0.0))]);
        let bob = &stats[0];
        assert_eq!(bob.played_games, 0);
        assert_eq!(bob.played_share, 0.0);
        assert_eq!(bob.mean_playtime, None);
        assert_eq!(bob.median_playtime, None);
        assert_eq!(bob.mean_achievement_ratio, None);
    }
}

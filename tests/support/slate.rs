use std::io::Write;

use tempfile::NamedTempFile;

/// One game with first-five and full-game moneylines linked historically and
/// a player prop that is void unless the player starts, plus a second game.
pub const GAME_SLATE: &str = r#"
[[bets]]
id = "nyy-f5"
event = "nyy-bos"
market = "first_five_moneyline"
selection = "NYY"
decimal_odds = 2.05
marginal_prob = 0.52

[[bets]]
id = "nyy-ml"
event = "nyy-bos"
market = "moneyline"
selection = "NYY"
decimal_odds = 1.91
marginal_prob = 0.56

[[bets]]
id = "judge-start"
event = "nyy-bos"
market = "player_starts"
selection = "Judge"
decimal_odds = 1.10
marginal_prob = 0.95

[[bets]]
id = "judge-hr"
event = "nyy-bos"
market = "player_home_run"
selection = "Judge"
decimal_odds = 3.40
marginal_prob = 0.33

[[bets]]
id = "lad-ml"
event = "lad-sf"
market = "moneyline"
selection = "LAD"
decimal_odds = 1.90
marginal_prob = 0.58

[[relationships]]
parent = "nyy-f5"
child = "nyy-ml"
type = "probability_conditional"
prob_child_given_parent_wins = 0.78
prob_child_given_parent_loses = 0.30
trust = 0.85
source = "historical"
sample_size = 15000

[[relationships]]
parent = "judge-start"
child = "judge-hr"
type = "void_if_parent_loses"
trust = 0.99
source = "rule"
"#;

/// Config with no solver backend, so sizing is deterministic fractional Kelly.
pub const KELLY_CONFIG: &str = r#"
[logging]
level = "warn"

[risk]
bankroll = 10000
max_exposure = 0.25
max_single_bet = 0.05
min_edge = 0.02

[solver]
backend = "none"
"#;

pub fn temp_toml(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("betgraph-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// `GAME_SLATE` with one outcome appended.
pub fn with_outcome(bet: &str, won: bool) -> String {
    format!("{GAME_SLATE}\n[[outcomes]]\nbet = \"{bet}\"\nwon = {won}\n")
}

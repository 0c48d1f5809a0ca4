use crate::models::RecordsResponse;
use crate::podium::{PodiumEntry, visible};
use crate::streaks::StreakStats;

pub fn render_index(user: &str, records: &RecordsResponse) -> String {
    let rows: String = visible(&records.podium).map(render_podium_row).collect();
    let podium = if rows.is_empty() {
        r#"<p class="hint">No habits logged yet.</p>"#.to_string()
    } else {
        format!(r#"<ol class="podium">{rows}</ol>"#)
    };

    INDEX_HTML
        .replace("{{USER}}", &escape_html(user))
        .replace("{{DATE}}", &records.today.date.to_string())
        .replace("{{MOOD}}", check(records.today.mood_logged))
        .replace("{{GYM}}", check(records.today.gym_logged))
        .replace("{{HABITS_DONE}}", &records.today.habits_done.to_string())
        .replace("{{WORKOUT_STATE}}", streak_state(&records.workout))
        .replace("{{WORKOUT_CURRENT}}", &records.workout.current_streak.to_string())
        .replace("{{WORKOUT_MAX}}", &records.workout.max_streak.to_string())
        .replace("{{PODIUM}}", &podium)
}

fn render_podium_row(entry: &PodiumEntry) -> String {
    let stats = &entry.stats;
    let detail = if stats.is_active() {
        format!("Active &middot; {}d", stats.current_streak)
    } else {
        format!("Inactive &middot; prev {}d", stats.max_streak)
    };
    let best_on = stats
        .max_streak_date
        .map(|date| format!(r#" <span class="hint">ended {date}</span>"#))
        .unwrap_or_default();

    format!(
        r#"<li class="row{active}"><span class="label">{label}</span><span class="detail">{detail}</span><span class="value">{max} days{best_on}</span></li>"#,
        active = if stats.is_active() { " active" } else { "" },
        label = escape_html(&entry.label),
        max = stats.max_streak,
    )
}

fn streak_state(stats: &StreakStats) -> &'static str {
    if stats.is_active() { "Streaking" } else { "Resting" }
}

fn check(done: bool) -> &'static str {
    if done { "Logged" } else { "Not yet" }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Streak Board</title>
  <style>
    :root {
      --bg: #f8fafc;
      --ink: #1e293b;
      --muted: #94a3b8;
      --accent: #f97316;
      --card: #ffffff;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(560px, 100%);
      display: grid;
      gap: 20px;
    }

    h1, h2 {
      margin: 0;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(30, 41, 59, 0.06);
      display: grid;
      gap: 10px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
    }

    .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .value {
      font-size: 1.4rem;
      font-weight: 700;
    }

    .podium {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .row {
      display: grid;
      grid-template-columns: 1fr auto;
      gap: 4px 12px;
      padding: 12px 14px;
      border-radius: 14px;
      background: #f1f5f9;
    }

    .row.active {
      background: #fff7ed;
    }

    .row.active .detail {
      color: var(--accent);
    }

    .detail {
      font-size: 0.75rem;
      font-weight: 700;
      text-transform: uppercase;
      color: var(--muted);
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <p class="label">{{USER}} &middot; {{DATE}}</p>
      <h1>Records</h1>
    </header>

    <section class="panel">
      <div class="card"><span class="label">Mood</span><span class="value">{{MOOD}}</span></div>
      <div class="card"><span class="label">Gym</span><span class="value">{{GYM}}</span></div>
      <div class="card"><span class="label">Habits</span><span class="value">{{HABITS_DONE}}</span></div>
    </section>

    <section class="card">
      <span class="label">Workout streak &middot; {{WORKOUT_STATE}}</span>
      <span class="value">{{WORKOUT_CURRENT}} <span class="hint">/ {{WORKOUT_MAX}} best</span></span>
    </section>

    <section class="card">
      <h2>Habit podium</h2>
      {{PODIUM}}
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;
    use crate::models::TodayStatus;

    fn records(podium: Vec<PodiumEntry>) -> RecordsResponse {
        RecordsResponse {
            today: TodayStatus {
                date: DateKey::parse("2026-01-05").unwrap(),
                mood_logged: true,
                gym_logged: false,
                habits_done: 2,
            },
            workout: StreakStats {
                current_streak: 3,
                max_streak: 9,
                max_streak_date: None,
            },
            podium,
        }
    }

    #[test]
    fn renders_visible_podium_rows_only() {
        let podium = vec![
            PodiumEntry::new(
                "water",
                "Water <3L>",
                StreakStats {
                    current_streak: 2,
                    max_streak: 4,
                    max_streak_date: DateKey::parse("2025-12-30").ok(),
                },
            ),
            PodiumEntry::new("steps", "10k Steps", StreakStats::default()),
        ];
        let html = render_index("alice", &records(podium));
        assert!(html.contains("Water &lt;3L&gt;"));
        assert!(html.contains("Active &middot; 2d"));
        assert!(html.contains("ended 2025-12-30"));
        assert!(!html.contains("10k Steps"));
        assert!(html.contains("Streaking"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn empty_podium_shows_hint() {
        let html = render_index("<bob>", &records(Vec::new()));
        assert!(html.contains("No habits logged yet."));
        assert!(html.contains("&lt;bob&gt;"));
    }
}

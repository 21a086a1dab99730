use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leitner_srs::{config, get_hint, Outcome, StudyDeck};

/// Demo deck: (item id, answer)
const DEMO_CARDS: [(&str, &str); 5] = [
  ("typescript", "A statically typed superset of JavaScript"),
  ("react", "A JavaScript library for building user interfaces"),
  ("closure", "A function that has access to variables from its outer lexical scope"),
  ("capital-france", "Paris"),
  ("capital-japan", "Tokyo"),
];

const DEMO_DAYS: u64 = 16;
const DEMO_SEED: u64 = 7;

/// Simulated learner: the higher the bucket, the likelier an easy recall
fn simulated_outcome(rng: &mut StdRng, bucket: u32) -> Outcome {
  let p_easy = (0.5 + 0.1 * bucket as f64).min(0.9);
  if rng.random_bool(p_easy) {
    Outcome::Easy
  } else if rng.random_bool(0.5) {
    Outcome::Hard
  } else {
    Outcome::Wrong
  }
}

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leitner_srs=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = config::load_config();
  let mut deck = StudyDeck::new(config);
  for (id, _) in DEMO_CARDS {
    deck.add_item(id);
  }

  let mut rng = StdRng::seed_from_u64(DEMO_SEED);
  let start = Utc::now() - Duration::days(DEMO_DAYS as i64);

  loop {
    let reviewed_at = start + Duration::days(deck.day() as i64);
    tracing::info!("Day {}: {} items due", deck.day(), deck.todays_practice().len());

    while let Some(item_id) = deck.current_item().cloned() {
      if let Some((_, answer)) = DEMO_CARDS.iter().find(|(id, _)| *id == item_id) {
        tracing::debug!("Hint for {}: {}", item_id, get_hint(answer));
      }
      let outcome = simulated_outcome(&mut rng, deck.bucket_of(&item_id));
      deck.answer_current(outcome, reviewed_at);
    }

    if deck.day() >= DEMO_DAYS {
      break;
    }
    deck.advance_day().expect("Day counter starts at 1");
  }

  let progress = deck.progress(Utc::now());
  println!(
    "{}",
    serde_json::to_string_pretty(&progress).expect("Failed to serialize progress")
  );
}

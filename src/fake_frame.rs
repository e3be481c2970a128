use rand::Rng;

use crate::batch::DribbleEvent;
use crate::freeze_frame::PlayerRecord;

const PITCH_LENGTH: f64 = 120.0;
const PITCH_WIDTH: f64 = 80.0;

/// A freeze frame with exactly one actor. Other players are scattered around
/// the actor so the distance bands actually get populated.
pub fn random_freeze_frame<R: Rng>(
    rng: &mut R,
    teammates: usize,
    opponents: usize,
) -> Vec<PlayerRecord> {
    let ax = rng.gen_range(0.0..PITCH_LENGTH);
    let ay = rng.gen_range(0.0..PITCH_WIDTH);

    let mut frame = Vec::with_capacity(1 + teammates + opponents);
    frame.push(PlayerRecord::actor(ax, ay));
    for _ in 0..teammates {
        let (x, y) = near(rng, ax, ay, 25.0);
        frame.push(PlayerRecord::teammate(x, y));
    }
    for _ in 0..opponents {
        let (x, y) = near(rng, ax, ay, 15.0);
        frame.push(PlayerRecord::opponent(x, y));
    }
    frame
}

pub fn random_event<R: Rng>(rng: &mut R, teammates: usize, opponents: usize) -> DribbleEvent {
    let seq: u32 = rng.r#gen();
    DribbleEvent {
        id: Some(format!("fake-{seq:08x}")),
        velocity: rng.gen_range(0.0..36.0),
        angle: rng.gen_range(-180.0..180.0),
        freeze_frame: random_freeze_frame(rng, teammates, opponents),
        minute: rng.gen_range(0.0..95.0),
        attacker_minutes_played: rng.gen_range(0.0..=90.0),
        defender_minutes_played: rng.gen_range(0.0..=90.0),
        goal_difference: rng.gen_range(-3..=3),
    }
}

fn near<R: Rng>(rng: &mut R, x: f64, y: f64, spread: f64) -> (f64, f64) {
    let nx = (x + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_LENGTH);
    let ny = (y + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_WIDTH);
    (nx, ny)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn frame_has_one_actor_and_requested_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        let frame = random_freeze_frame(&mut rng, 6, 4);
        assert_eq!(frame.len(), 11);
        assert_eq!(frame.iter().filter(|p| p.actor).count(), 1);
        assert_eq!(frame.iter().filter(|p| !p.actor && p.teammate).count(), 6);
        assert_eq!(frame.iter().filter(|p| !p.teammate).count(), 4);
    }

    #[test]
    fn event_context_stays_in_valid_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let ev = random_event(&mut rng, 3, 3);
            assert!((0.0..=90.0).contains(&ev.attacker_minutes_played));
            assert!((0.0..=90.0).contains(&ev.defender_minutes_played));
            assert!((-3..=3).contains(&ev.goal_difference));
        }
    }
}

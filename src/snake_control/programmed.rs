use serde::{Deserialize, Serialize};

use crate::basic::{Point, Seconds};
use crate::snake_control::{Controller, SnakeView};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Move {
    /// Start turning towards a new facing
    Turn(Point),
    /// Keep the current target for this many ticks
    Wait(usize),
    Sprint(bool),
}

/// Replays a fixed sequence of moves, looping at the end
pub struct Programmed {
    pub move_sequence: Vec<Move>,
    pub facing: Point,
    pub next_move_idx: usize,
    pub wait: usize,
    pub sprinting: bool,
    pub stopped: bool,
}

impl Programmed {
    pub fn new(move_sequence: Vec<Move>, facing: Point) -> Self {
        Self {
            move_sequence,
            facing,
            next_move_idx: 0,
            wait: 0,
            sprinting: false,
            stopped: false,
        }
    }

    // consume moves until one of them takes time
    fn advance(&mut self) {
        if self.wait > 0 {
            self.wait -= 1;
            return;
        }

        // a sequence without waits would spin forever
        for _ in 0..self.move_sequence.len() {
            let Some(&next) = self.move_sequence.get(self.next_move_idx) else {
                return;
            };
            self.next_move_idx = (self.next_move_idx + 1) % self.move_sequence.len();

            match next {
                Move::Turn(facing) => self.facing = facing,
                Move::Sprint(sprinting) => self.sprinting = sprinting,
                Move::Wait(0) => {}
                Move::Wait(wait) => {
                    self.wait = wait - 1;
                    return;
                }
            }
        }
    }
}

impl Controller for Programmed {
    fn target_facing(&mut self, _: &SnakeView, _: Seconds) -> Point {
        self.advance();
        self.facing
    }

    fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn reset(&mut self, facing: Point) {
        self.facing = facing;
        self.next_move_idx = 0;
        self.wait = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SnakeView {
        SnakeView {
            head: Point::ZERO,
            facing: Point::X,
            ground_speed: 5.,
        }
    }

    #[test]
    fn waits_then_turns() {
        let mut programmed = Programmed::new(
            vec![Move::Turn(Point::Z), Move::Wait(2), Move::Sprint(true), Move::Turn(-Point::X), Move::Wait(1)],
            Point::X,
        );

        let facings = (0..5)
            .map(|_| programmed.target_facing(&view(), 0.1))
            .collect::<Vec<_>>();
        assert_eq!(facings, vec![Point::Z, Point::Z, -Point::X, Point::Z, Point::Z]);
        assert!(programmed.is_sprinting());
    }

    #[test]
    fn sequence_without_waits_terminates() {
        let mut programmed = Programmed::new(vec![Move::Turn(Point::Z), Move::Turn(-Point::Z)], Point::X);
        assert_eq!(programmed.target_facing(&view(), 0.1), -Point::Z);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut programmed = Programmed::new(vec![Move::Wait(3), Move::Turn(Point::Z), Move::Wait(1)], Point::X);
        programmed.target_facing(&view(), 0.1);
        programmed.reset(-Point::X);
        assert_eq!(programmed.target_facing(&view(), 0.1), -Point::X);
        assert_eq!(programmed.wait, 2);
    }
}

//! Quadrature decoding for the rotary tuning knob.
//!
//! The encoder produces two phase-shifted binary signals; one mechanical
//! detent walks the Gray-code cycle `00 → 01 → 11 → 10 → 00` (clockwise) or
//! the reverse (counter-clockwise). The decoder is fed one sample per edge
//! interrupt on either pin and emits exactly one event per completed detent.
//! Partial or reversed rotations emit nothing, which debounces the contacts
//! without timers or counters.

/// One completed detent of the knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Up,
    Down,
}

/// Remembered rotation direction while a detent is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Left,
    Right,
}

/// The four 2-bit pin states of the quadrature cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    P00,
    P01,
    P10,
    P11,
}

impl Phase {
    #[inline]
    fn from_pins(a: bool, b: bool) -> Self {
        match (a, b) {
            (false, false) => Phase::P00,
            (false, true) => Phase::P01,
            (true, false) => Phase::P10,
            (true, true) => Phase::P11,
        }
    }
}

/// Branch-table quadrature state machine. O(1) per sample, no queue.
#[derive(Debug)]
pub struct QuadratureDecoder {
    phase: Phase,
    pending: Option<Pending>,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureDecoder {
    /// Start at the resting phase (both pins low) with no direction memory.
    pub fn new() -> Self {
        Self {
            phase: Phase::P00,
            pending: None,
        }
    }

    /// Feed one pin sample, taken on any edge of either pin. Returns the
    /// rotation event when this sample completes a detent.
    ///
    /// The new phase is always persisted, event or not; duplicate and
    /// unexpected samples fall through the table without effect.
    pub fn sample(&mut self, pin_a: bool, pin_b: bool) -> Option<Rotation> {
        use Phase::*;
        let next = Phase::from_pins(pin_a, pin_b);

        let event = match (self.phase, next) {
            (P00, P01) => {
                self.pending = Some(Pending::Right);
                None
            }
            (P00, P10) => {
                self.pending = Some(Pending::Left);
                None
            }
            (P01, P11) => {
                self.pending = Some(Pending::Right);
                None
            }
            (P01, P00) => (self.pending == Some(Pending::Left)).then_some(Rotation::Down),
            (P10, P11) => {
                self.pending = Some(Pending::Left);
                None
            }
            (P10, P00) => (self.pending == Some(Pending::Right)).then_some(Rotation::Up),
            (P11, P01) => {
                self.pending = Some(Pending::Left);
                None
            }
            (P11, P10) => {
                self.pending = Some(Pending::Right);
                None
            }
            // Skipped an intermediate 01/10 sample; the remembered direction
            // still tells us whether the detent completed.
            (P11, P00) => match self.pending {
                Some(Pending::Left) => Some(Rotation::Down),
                Some(Pending::Right) => Some(Rotation::Up),
                None => None,
            },
            _ => None,
        };

        self.phase = next;
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(dec: &mut QuadratureDecoder, seq: &[(bool, bool)]) -> Vec<Rotation> {
        seq.iter()
            .filter_map(|&(a, b)| dec.sample(a, b))
            .collect()
    }

    #[test]
    fn clockwise_detent_emits_one_up() {
        let mut dec = QuadratureDecoder::new();
        let events = feed(
            &mut dec,
            &[(false, true), (true, true), (true, false), (false, false)],
        );
        assert_eq!(events, vec![Rotation::Up]);
    }

    #[test]
    fn counter_clockwise_detent_emits_one_down() {
        let mut dec = QuadratureDecoder::new();
        let events = feed(
            &mut dec,
            &[(true, false), (true, true), (false, true), (false, false)],
        );
        assert_eq!(events, vec![Rotation::Down]);
    }

    #[test]
    fn reversal_emits_nothing() {
        let mut dec = QuadratureDecoder::new();
        let events = feed(&mut dec, &[(false, true), (false, false)]);
        assert!(events.is_empty());
    }

    #[test]
    fn skipped_phase_resolves_via_pending_direction() {
        let mut dec = QuadratureDecoder::new();
        // 00 -> 01 -> 11 -> 00, missing the 10 sample
        let events = feed(&mut dec, &[(false, true), (true, true), (false, false)]);
        assert_eq!(events, vec![Rotation::Up]);

        // 00 -> 10 -> 11 -> 00, missing the 01 sample
        let events = feed(&mut dec, &[(true, false), (true, true), (false, false)]);
        assert_eq!(events, vec![Rotation::Down]);
    }

    #[test]
    fn duplicate_samples_are_ignored() {
        let mut dec = QuadratureDecoder::new();
        let events = feed(
            &mut dec,
            &[
                (false, true),
                (false, true),
                (true, true),
                (true, true),
                (true, false),
                (false, false),
            ],
        );
        assert_eq!(events, vec![Rotation::Up]);
    }

    #[test]
    fn consecutive_detents_each_emit() {
        let mut dec = QuadratureDecoder::new();
        let cw = [(false, true), (true, true), (true, false), (false, false)];
        let mut events = Vec::new();
        for _ in 0..3 {
            events.extend(feed(&mut dec, &cw));
        }
        assert_eq!(events, vec![Rotation::Up; 3]);
    }
}

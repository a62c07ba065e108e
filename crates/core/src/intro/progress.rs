use rand::{rngs::StdRng, Rng, SeedableRng};

pub const IDLE_LABEL: &str = "READY";
pub const ACTIVE_LABEL: &str = "PORTFOLIO";

const SIMULATED_FILES: u32 = 1000;
const SIMULATED_SECONDS: u32 = 300;
const SCRAMBLE_SECONDS: f32 = 0.8;
const SCRAMBLE_STEP: f32 = 0.1;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Download-style progress readout shown while the preloader is up.
///
/// Progress is cosmetic: it advances one percent per step until it reaches
/// 100 regardless of what the page is actually loading.
#[derive(Debug)]
pub struct LoadingIndicator {
    step_seconds: f32,
    progress: u8,
    accumulator: f32,
    animating: bool,
    complete: bool,
    label: ScrambleText,
}

impl LoadingIndicator {
    pub fn new(duration_seconds: f32, rng: StdRng) -> Self {
        Self {
            step_seconds: duration_seconds.max(f32::EPSILON) / 100.0,
            progress: 0,
            accumulator: 0.0,
            animating: false,
            complete: false,
            label: ScrambleText::new(IDLE_LABEL, rng),
        }
    }

    pub fn start(&mut self) {
        if self.animating {
            return;
        }
        self.animating = true;
        self.label.set_target(ACTIVE_LABEL);
    }

    /// Advances the simulation. Returns `true` on the tick progress reaches 100.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.label.advance(delta);
        if !self.animating || self.progress >= 100 {
            return false;
        }

        self.accumulator += delta.max(0.0);
        while self.accumulator >= self.step_seconds && self.progress < 100 {
            self.accumulator -= self.step_seconds;
            self.progress += 1;
        }
        self.progress >= 100
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn files_count(&self) -> u32 {
        u32::from(self.progress) * SIMULATED_FILES / 100
    }

    pub fn seconds_remaining(&self) -> u32 {
        SIMULATED_SECONDS.saturating_sub(u32::from(self.progress) * SIMULATED_SECONDS / 100)
    }

    pub fn time_remaining_label(&self) -> String {
        format_remaining(self.seconds_remaining())
    }

    pub fn label(&self) -> String {
        self.label.display()
    }
}

/// Formats seconds as `"{m}min {ss}sec"`.
pub fn format_remaining(seconds: u32) -> String {
    format!("{}min {:02}sec", seconds / 60, seconds % 60)
}

/// Text that decodes into its target one character at a time, showing random
/// capitals in the positions not yet revealed.
#[derive(Debug)]
pub struct ScrambleText {
    target: Vec<char>,
    display: Vec<char>,
    iterations: f32,
    accumulator: f32,
    animating: bool,
    rng: StdRng,
}

impl ScrambleText {
    pub fn new(initial: &str, rng: StdRng) -> Self {
        Self {
            target: initial.chars().collect(),
            display: initial.chars().collect(),
            iterations: 0.0,
            accumulator: 0.0,
            animating: false,
            rng,
        }
    }

    pub fn seeded(initial: &str, seed: u64) -> Self {
        Self::new(initial, StdRng::seed_from_u64(seed))
    }

    pub fn set_target(&mut self, target: &str) {
        let target: Vec<char> = target.chars().collect();
        if target == self.target {
            return;
        }
        self.target = target;
        self.iterations = 0.0;
        self.accumulator = 0.0;
        self.animating = true;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn display(&self) -> String {
        self.display.iter().collect()
    }

    fn interval(&self) -> f32 {
        SCRAMBLE_SECONDS / (self.target.len().max(1) as f32 * 10.0)
    }

    pub fn advance(&mut self, delta: f32) {
        if !self.animating {
            return;
        }
        self.accumulator += delta.max(0.0);
        let interval = self.interval();
        while self.animating && self.accumulator >= interval {
            self.accumulator -= interval;
            self.step();
        }
    }

    fn step(&mut self) {
        if self.iterations >= self.target.len() as f32 {
            self.animating = false;
            self.display = self.target.clone();
            return;
        }

        let revealed = self.iterations;
        let rng = &mut self.rng;
        self.display = self
            .target
            .iter()
            .enumerate()
            .map(|(index, &letter)| {
                if letter == ' ' || index as f32 <= revealed {
                    letter
                } else {
                    char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())])
                }
            })
            .collect();
        self.iterations += SCRAMBLE_STEP;
    }
}

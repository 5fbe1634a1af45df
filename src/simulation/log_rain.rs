use bevy_ecs::prelude::*;

const GLITCH_CHARS: &[u8] = b"#$%&*@/<>+=-";

/// Deterministic generator for the falling log text.
#[derive(Resource, Debug, Clone)]
pub struct LogRain {
    rng: u64,
}

impl LogRain {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seed ^ hash_seed("log-rain"),
        }
    }

    /// `count` copies of `base`, glitched when `glitch` is set.
    pub fn burst(&mut self, base: &str, count: usize, glitch: bool) -> Vec<String> {
        (0..count)
            .map(|_| {
                if glitch {
                    self.glitch(base)
                } else {
                    base.to_string()
                }
            })
            .collect()
    }

    /// 25% replace with a glitch symbol, 5% insert one before the original.
    pub fn glitch(&mut self, base: &str) -> String {
        let mut out = String::with_capacity(base.len() + base.len() / 4);
        for ch in base.chars() {
            let roll = next_u64(&mut self.rng) % 100;
            if roll < 25 {
                out.push(self.glitch_char());
            } else if roll < 30 {
                out.push(self.glitch_char());
                out.push(ch);
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn glitch_char(&mut self) -> char {
        let idx = (next_u64(&mut self.rng) % GLITCH_CHARS.len() as u64) as usize;
        GLITCH_CHARS[idx] as char
    }
}

fn next_u64(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

fn hash_seed(value: &str) -> u64 {
    let mut hash = 1469598103934665603u64;
    for byte in value.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(1099511628211);
    }
    hash
}

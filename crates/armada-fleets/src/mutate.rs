//! Registry mutation operators for population evolution.
//!
//! Each controller publishes a table of mutable parameters; the driver
//! applies these operators to a cloned fleet's registry between rounds.

use armada_core::registry::Registry;
use armada_core::rng::SimRng;

/// How one float-valued registry key mutates.
#[derive(Debug, Clone, Copy)]
pub struct MutationFloatParams {
    pub key: &'static str,
    pub min_value: f32,
    pub max_value: f32,
    /// Relative size of a scale or offset step.
    pub magnitude: f32,
    /// Chance a mutation re-rolls uniformly instead of stepping.
    pub jump_rate: f32,
    /// Chance this key mutates at all in one round.
    pub mutation_rate: f32,
}

/// How one bool-valued registry key mutates.
#[derive(Debug, Clone, Copy)]
pub struct MutationBoolParams {
    pub key: &'static str,
    pub flip_rate: f32,
}

/// Mutate float keys in place. A missing key always re-rolls uniformly.
pub fn mutate_floats(reg: &mut Registry, rng: &mut SimRng, params: &[MutationFloatParams]) {
    for mp in params {
        if !rng.flip(mp.mutation_rate) {
            continue;
        }

        let mut value = reg.get_float_or(mp.key, 0.0);
        if !reg.contains(mp.key) || rng.flip(mp.jump_rate) {
            value = rng.float(mp.min_value, mp.max_value);
        } else if rng.bit() {
            if rng.bit() {
                value *= 1.0 - mp.magnitude;
            } else {
                value *= 1.0 + mp.magnitude;
            }
        } else {
            let mut range = (mp.max_value - mp.min_value).abs();
            range = rng.float(range * (1.0 - mp.magnitude), range * (1.0 + mp.magnitude));
            if rng.bit() {
                value += mp.magnitude * range;
            } else {
                value -= mp.magnitude * range;
            }
        }

        value = value.clamp(mp.min_value, mp.max_value);
        reg.put_float(mp.key, value);
    }
}

/// Mutate bool keys in place. A missing key gets a random bit.
pub fn mutate_bools(reg: &mut Registry, rng: &mut SimRng, params: &[MutationBoolParams]) {
    for mp in params {
        if !rng.flip(mp.flip_rate) {
            continue;
        }

        let value = match reg.get_bool(mp.key) {
            Some(v) => !v,
            None => rng.bit(),
        };
        reg.put_bool(mp.key, value);
    }
}

//! Event cue synthesis over Web Audio. Audio is strictly presentation: the
//! session never knows whether a context exists, and every failure path here
//! is swallowed so missing audio support degrades to a silent game.

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

/// Audio notification kinds the presentation layer can trigger.
#[derive(Clone, Copy, Debug)]
pub enum Cue {
    /// Successful pairing: ascending C5 / E5 / G5.
    Match,
    /// Board completed: C5 / E5 / G5 / C6.
    Complete,
    /// Quote popup mood cue: low triangle A3 / B3 / G3 with a 4 Hz tremolo.
    Noir,
}

/// Browsers gate `AudioContext` behind a user gesture; call this from the
/// first click. `None` simply means the game stays silent.
pub fn init() -> Option<AudioContext> {
    AudioContext::new().ok()
}

pub fn play(ctx: &AudioContext, cue: Cue) {
    let _ = try_play(ctx, cue);
}

fn try_play(ctx: &AudioContext, cue: Cue) -> Result<(), JsValue> {
    let t0 = ctx.current_time();
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let freq = osc.frequency();
    match cue {
        Cue::Match => {
            freq.set_value_at_time(523.25, t0)?; // C5
            freq.set_value_at_time(659.25, t0 + 0.1)?; // E5
            freq.set_value_at_time(783.99, t0 + 0.2)?; // G5
        }
        Cue::Complete => {
            freq.set_value_at_time(523.25, t0)?; // C5
            freq.set_value_at_time(659.25, t0 + 0.2)?; // E5
            freq.set_value_at_time(783.99, t0 + 0.4)?; // G5
            freq.set_value_at_time(1046.50, t0 + 0.6)?; // C6
        }
        Cue::Noir => {
            osc.set_type(OscillatorType::Triangle);
            freq.set_value_at_time(220.0, t0)?; // A3
            freq.set_value_at_time(246.94, t0 + 0.3)?; // B3
            freq.set_value_at_time(196.0, t0 + 0.6)?; // G3

            // Slow tremolo modulating the output gain.
            let tremolo = ctx.create_oscillator()?;
            let tremolo_gain = ctx.create_gain()?;
            tremolo.frequency().set_value_at_time(4.0, t0)?;
            tremolo.connect_with_audio_node(&tremolo_gain)?;
            tremolo_gain.connect_with_audio_param(&gain.gain())?;
            tremolo_gain.gain().set_value_at_time(0.02, t0)?;
            tremolo.start_with_when(t0)?;
            tremolo.stop_with_when(t0 + 1.2)?;
        }
    }

    gain.gain().set_value_at_time(0.1, t0)?;
    gain.gain().exponential_ramp_to_value_at_time(0.01, t0 + 0.8)?;
    osc.start_with_when(t0)?;
    osc.stop_with_when(t0 + 0.8)?;
    Ok(())
}

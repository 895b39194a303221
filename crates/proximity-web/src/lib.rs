#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod canvas;
mod dom;
mod events;
mod frame;
mod glyphs;
mod magnetic_button;
mod markup;
mod observer;
mod particle_field;
mod scrambled_text;
mod variable_proximity;

pub use magnetic_button::MagneticButton;
pub use particle_field::ParticleField;
pub use scrambled_text::ScrambledText;
pub use variable_proximity::VariableProximity;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("proximity-web ready");
    Ok(())
}

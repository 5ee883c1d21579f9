mod frame;
mod guess_vm;

pub use frame::{png_data_url, render_frame};
pub use guess_vm::{ERROR_MESSAGE, GuessIntent, GuessVm, apply_intent};

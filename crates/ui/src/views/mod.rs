mod beast_image;
mod guesser;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use beast_image::{BeastImage, device_pixel_ratio};
pub use guesser::GuesserView;

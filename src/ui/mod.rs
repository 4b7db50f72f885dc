use egui::Color32;

pub mod analysis;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);

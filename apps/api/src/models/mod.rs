pub mod pathway;
pub mod profile;

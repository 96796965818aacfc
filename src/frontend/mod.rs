pub mod vax;

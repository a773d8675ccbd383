pub mod brochure;

pub mod sunsets;

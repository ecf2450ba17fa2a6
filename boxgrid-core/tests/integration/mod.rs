mod editor_tests;
mod persistence_tests;

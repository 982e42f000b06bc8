mod deck_manager;

pub use deck_manager::TestDeckManager;

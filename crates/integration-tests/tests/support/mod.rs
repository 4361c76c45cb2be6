pub mod mock_ui;
pub mod oracles;

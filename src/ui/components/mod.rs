pub mod alert;
pub mod block_column;
pub mod certificate_view;
pub mod name_prompt;
pub mod progress_bar;

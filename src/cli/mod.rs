mod commands;
mod handlers;

pub use commands::{Cli, Commands, NoteBodyArgs, ServeArgs, StoreArgs};
pub use handlers::{
    format_note_detail, format_note_summary, handle_add, handle_delete, handle_get, handle_list,
    handle_ping, handle_serve, handle_tags, handle_update,
};

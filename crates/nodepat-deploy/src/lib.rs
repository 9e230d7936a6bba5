mod fetch;
mod fs_utils;
mod layout;
mod path_env;
mod registration;
mod removal;
mod reversal;

pub use fetch::{download_client, download_file, install_binary, install_icon};
pub use fs_utils::{remove_file_if_exists, set_executable};
pub use layout::{default_install_dir, DirState, InstallLayout, APP_NAME, UNINSTALLER_NAME};
pub use path_env::{
    add_dir_to_store, add_install_dir_to_path, add_path_block_to_file, append_path_block,
    append_path_segment, profile_file_for_shell, remove_dir_from_store,
    remove_install_dir_from_path, remove_path_block_from_file, render_path_block,
    strip_path_block, strip_path_segment, PathChange, UserPathStore, WindowsPathStore,
    PATH_BLOCK_BEGIN, PATH_BLOCK_END,
};
pub use registration::{
    desktop_shortcut_path, register_desktop_shortcut, render_desktop_entry,
    render_shortcut_script, unregister_desktop_shortcut, FALLBACK_ICON,
};
pub use removal::{
    remove_artifact_file, remove_install_dir_if_empty, remove_installed_files, RemovalReport,
    RemovedArtifact,
};
pub use reversal::{remove_self, write_uninstaller, SelfRemoval};

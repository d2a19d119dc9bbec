pub mod analysis;
pub mod commands;
pub mod models;
pub mod source;

#[cfg(feature = "desktop")]
use commands::{
    dashboard::{compute_velocity, contributor_report, find_stale, project_landing_zone},
    settings::{get_settings, save_settings},
};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            get_settings,
            save_settings,
            compute_velocity,
            project_landing_zone,
            find_stale,
            contributor_report,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

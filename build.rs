const COMMANDS: &[&str] = &[
    "request_device_camera_authorization",
    "check_device_camera_authorization_status",
    "has_camera_permission",
    "capture",
    "change_camera",
    "set_flash_mode",
    "dispatch_touch",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS)
        .android_path("android")
        .ios_path("ios")
        .build();
}

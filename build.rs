fn main() {
    #[cfg(target_os = "windows")]
    {
        println!("cargo:rerun-if-changed=assets/logo.ico");
        if std::path::Path::new("assets/logo.ico").exists() {
            let mut res = winres::WindowsResource::new();
            res.set_icon("assets/logo.ico");
            res.compile().expect("Failed to compile Windows resources");
        }
    }
}

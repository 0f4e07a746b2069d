use crate::core::config::data::Config;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.server_url {
            Some(url) => println!("  server-url: {url}"),
            None => println!("  server-url: (unset)"),
        }
        match &self.data_dir {
            Some(dir) => println!("  data-dir: {}", dir.display()),
            None => println!("  data-dir: (unset)"),
        }
        match &self.voice.locale {
            Some(locale) => println!("  voice-locale: {locale}"),
            None => println!("  voice-locale: (unset)"),
        }
        match self.voice_command() {
            Some(argv) => println!("  voice.command: {}", argv.join(" ")),
            None => println!("  voice.command: (unset, voice input disabled)"),
        }
        match self.camera_command() {
            Some(argv) => {
                let (width, height) = self.camera_dimensions();
                println!("  camera.command: {}", argv.join(" "));
                println!("  camera.size: {width}x{height}");
            }
            None => println!("  camera.command: (unset, camera capture disabled)"),
        }
    }
}

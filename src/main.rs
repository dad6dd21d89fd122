use bathyscope::AppConfig;

fn main() {
    env_logger::init();
    log::info!("starting bathyscope");

    bathyscope::run(AppConfig::new().title("Bathyscope").size(800, 600));
}

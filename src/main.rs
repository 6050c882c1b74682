// forthcore reference REPL

mod config;
mod internals;
mod kernel;
mod runtime;

use config::Config;
use internals::files::FileHandle;
use runtime::ForthRuntime;

fn main() {
    let config: Config = Config::from_env();

    let mut rt = ForthRuntime::new();
    rt.msg.set_level(config.debug_level());
    rt.cold_start();

    if let Some(path) = &config.file {
        match FileHandle::open(std::path::Path::new(path)) {
            Ok(handle) => rt.push_source(handle),
            Err(e) => {
                rt.msg.error("main", &format!("Could not open file: {path}"), Some(e));
                return;
            }
        }
    }

    rt.run();
}

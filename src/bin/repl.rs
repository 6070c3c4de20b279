use tiny_lisp::{cmdline, Interpreter};

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    let interpreter = Interpreter::with_prelude()?;
    let config = cmdline::Config::from_args(std::env::args())?;
    cmdline::launch(&config, &interpreter)
}

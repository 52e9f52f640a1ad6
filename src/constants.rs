// src/constants.rs

/// The name of the directory holding termexec configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "termexec";

/// The name of the runner configuration file (inside the termexec config dir).
pub const RUNNER_CONFIG_FILENAME: &str = "runner.toml";

/// The tag attached to every line the runner sends to its logger.
pub const LOG_TAG: &str = "[CommandRunner]";

/// The substitution slot the command text is inserted into.
pub const TEMPLATE_SLOT: &str = "{0}";

/// Default interpreter on Unix-like systems.
pub const UNIX_EXECUTABLE: &str = "/bin/bash";

/// Default argument template on Unix-like systems.
pub const UNIX_ARGUMENT_TEMPLATE: &str = " -c \"{0} \"";

/// Default interpreter on Windows.
pub const WINDOWS_EXECUTABLE: &str = "powershell.exe";

/// Default argument template on Windows.
pub const WINDOWS_ARGUMENT_TEMPLATE: &str = "-NoProfile -ExecutionPolicy unrestricted {0}";

/// `CREATE_NO_WINDOW` process creation flag.
pub const CREATE_NO_WINDOW: u32 = 0x0800_0000;

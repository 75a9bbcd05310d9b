//! Ready-made plugin implementations
//!
//! [`register_builtins`] makes each of them loadable by the identifier listed
//! below:
//!
//! | Identifier           | Plugin                | Capability |
//! |----------------------|-----------------------|------------|
//! | `registry-create`    | [`RegistryCreate`]    | Create     |
//! | `console-mirror`     | [`ConsoleMirror`]     | Log        |
//! | `fixed-name`         | [`FixedName`]         | GetName    |
//! | `template-formatter` | [`TemplateFormatter`] | Formatter  |
//! | `plain-close`        | [`PlainClose`]        | Close      |
//! | `announce` (startup) | [`AnnounceStartup`]   |            |

pub mod close;
pub mod console;
pub mod create;
pub mod naming;
pub mod startup;
pub mod template;

pub use close::PlainClose;
pub use console::ConsoleMirror;
pub use create::RegistryCreate;
pub use naming::FixedName;
pub use startup::AnnounceStartup;
pub use template::TemplateFormatter;

use crate::core::PluginRegistry;

pub const REGISTRY_CREATE: &str = "registry-create";
pub const CONSOLE_MIRROR: &str = "console-mirror";
pub const FIXED_NAME: &str = "fixed-name";
pub const TEMPLATE_FORMATTER: &str = "template-formatter";
pub const PLAIN_CLOSE: &str = "plain-close";
pub const ANNOUNCE: &str = "announce";

/// Add every builtin plugin to `registry`
pub fn register_builtins(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_plugin(REGISTRY_CREATE, || RegistryCreate)
        .with_plugin(CONSOLE_MIRROR, ConsoleMirror::new)
        .with_plugin(FIXED_NAME, FixedName::default)
        .with_plugin(TEMPLATE_FORMATTER, || TemplateFormatter)
        .with_plugin(PLAIN_CLOSE, || PlainClose)
        .with_startup(ANNOUNCE, || AnnounceStartup)
}

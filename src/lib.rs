// Surface Book 2 button array driver - host integration
// Config, platform enumeration, uinput children and GPIO naming export

pub mod config;
pub mod driver;
pub mod gpio_names;
pub mod uinput;

pub use config::DriverConfig;
pub use driver::{host_platform, AcpiDriver, HostController, Platform, SURFACEBOOK2_BUTTON_DRIVER};
pub use gpio_names::RuntimeGpioNames;
pub use uinput::{UinputButtonService, UinputChild};

//! Platform enumeration over a fake sysfs tree

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use surfacebook2_acpi::{
    AcpiBus, AcpiDevice, AcpiObject, DsmQuery, FirmwareError, NoGpioNames, Uuid,
};
use surfacebook2_button::{Platform, RuntimeGpioNames, SURFACEBOOK2_BUTTON_DRIVER};
use surfacebook2_buttons::{
    ButtonInputService, DeviceController, GroupConfig, GroupKind, ServiceError, SURFACEBOOK2,
};

struct Identity(u64);

impl DsmQuery for Identity {
    fn evaluate_dsm(
        &self,
        _node: &AcpiDevice,
        _guid: &Uuid,
        _revision: u64,
        _function: u64,
    ) -> Result<Option<AcpiObject>, FirmwareError> {
        Ok(Some(AcpiObject::Integer(self.0)))
    }
}

#[derive(Default)]
struct Log {
    created: Vec<String>,
    released: Vec<String>,
}

struct SharedService(Rc<RefCell<Log>>);

impl ButtonInputService for SharedService {
    type Handle = String;

    fn create(&mut self, config: &GroupConfig) -> Result<String, ServiceError> {
        let label = config.label().to_string();
        self.0.borrow_mut().created.push(label.clone());
        Ok(label)
    }

    fn release(&mut self, handle: String) -> Result<(), ServiceError> {
        self.0.borrow_mut().released.push(handle);
        Ok(())
    }
}

fn add_node(root: &Path, instance: &str, hid: &str, path: &str) {
    let dir = root.join(instance);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hid"), format!("{}\n", hid)).unwrap();
    fs::write(dir.join("path"), format!("{}\n", path)).unwrap();
}

fn platform(
    root: &Path,
    id: u64,
    log: &Rc<RefCell<Log>>,
) -> Platform<Identity, SharedService, NoGpioNames> {
    let log = Rc::clone(log);
    Platform::new(SURFACEBOOK2_BUTTON_DRIVER, AcpiBus::new(root), move |_node: &AcpiDevice| {
        DeviceController::new(
            Identity(id),
            SURFACEBOOK2,
            SharedService(Rc::clone(&log)),
            NoGpioNames,
        )
    })
}

#[test]
fn test_binds_only_the_button_array() {
    let tmp = tempfile::tempdir().unwrap();
    add_node(tmp.path(), "MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");
    add_node(tmp.path(), "MSHW0040:01", "MSHW0040", "\\_SB_.PCI0.BTNS");
    add_node(tmp.path(), "PNP0C0D:00", "PNP0C0D", "\\_SB_.LID0");
    // Missing path attribute, skipped during enumeration
    fs::create_dir_all(tmp.path().join("LNXSYSTM:00")).unwrap();

    let log = Rc::new(RefCell::new(Log::default()));
    let mut platform = platform(tmp.path(), 5, &log);

    assert_eq!(platform.candidates().unwrap().len(), 2);
    assert_eq!(platform.register().unwrap(), 1);

    let bound = platform.bound();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].node().unwrap().instance(), "MSHW0040:00");
    assert_eq!(
        bound[0].child(GroupKind::Single).map(String::as_str),
        Some("single")
    );
    assert_eq!(log.borrow().created, ["single", "autorepeat"]);

    platform.unregister();
    assert!(platform.bound().is_empty());
    assert_eq!(log.borrow().released, ["single", "autorepeat"]);
}

#[test]
fn test_register_twice_keeps_one_controller() {
    let tmp = tempfile::tempdir().unwrap();
    add_node(tmp.path(), "MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");

    let log = Rc::new(RefCell::new(Log::default()));
    let mut platform = platform(tmp.path(), 5, &log);

    assert_eq!(platform.register().unwrap(), 1);
    assert_eq!(platform.register().unwrap(), 0);
    assert_eq!(platform.bound().len(), 1);
    assert_eq!(log.borrow().created, ["single", "autorepeat"]);

    let node = AcpiDevice::new("MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");
    assert!(platform.is_bound(&node));
    assert!(!platform.probe(&node));
    assert_eq!(log.borrow().created.len(), 2);

    platform.unregister();
    assert!(!platform.is_bound(&node));
    assert_eq!(platform.register().unwrap(), 1);
}

#[test]
fn test_wrong_identity_binds_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    add_node(tmp.path(), "MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");

    let log = Rc::new(RefCell::new(Log::default()));
    let mut platform = platform(tmp.path(), 4, &log);

    assert_eq!(platform.register().unwrap(), 0);
    assert!(platform.bound().is_empty());
    assert!(log.borrow().created.is_empty());
}

#[test]
fn test_probe_single_node() {
    let tmp = tempfile::tempdir().unwrap();
    let log = Rc::new(RefCell::new(Log::default()));
    let mut platform = platform(tmp.path(), 5, &log);

    let node = AcpiDevice::new("MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");
    assert!(platform.probe(&node));
    assert_eq!(platform.bound().len(), 1);
}

#[test]
fn test_missing_bus_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let log = Rc::new(RefCell::new(Log::default()));
    let mut platform = platform(&tmp.path().join("absent"), 5, &log);

    assert!(platform.register().is_err());
}

#[test]
fn test_runtime_gpio_names_follow_binding() {
    let tmp = tempfile::tempdir().unwrap();
    let sysfs = tmp.path().join("sys");
    let run = tmp.path().join("run");
    add_node(&sysfs, "MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");

    let log = Rc::new(RefCell::new(Log::default()));
    let shared = Rc::clone(&log);
    let names_root = run.clone();
    let mut platform = Platform::new(
        SURFACEBOOK2_BUTTON_DRIVER,
        AcpiBus::new(&sysfs),
        move |_node: &AcpiDevice| {
            DeviceController::new(
                Identity(5),
                SURFACEBOOK2,
                SharedService(Rc::clone(&shared)),
                RuntimeGpioNames::new(&names_root),
            )
        },
    );

    assert_eq!(platform.register().unwrap(), 1);
    assert!(run.join("MSHW0040:00").join("gpios").exists());

    platform.unregister();
    assert!(!run.join("MSHW0040:00").exists());
}

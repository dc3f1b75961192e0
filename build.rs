fn main() {
    // ESP-IDF link/env plumbing is only needed when building for the device.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

fn main() {
    // ESP-IDF link/env propagation is only meaningful when the espidf
    // feature pulls in esp-idf-sys; host builds skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}

#[macro_export]
macro_rules! here {
    () => {
        concat!("at ", file!(), ":", line!(), ":", column!())
    };
}

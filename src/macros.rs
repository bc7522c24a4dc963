// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! cols {
    // Header row shorthand: cols!["a", "b"] → Vec<String>
    ($($name:expr),* $(,)?) => {
        vec![$(::std::string::String::from($name)),*]
    };
}

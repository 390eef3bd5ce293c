use std::str::FromStr;

pub fn parse_var<T: FromStr>(var: &str) -> Option<T> {
    dotenvy::var(var).ok().and_then(|i| i.parse::<T>().ok())
}

pub fn parse_strings_from_var(var: &str) -> Option<Vec<String>> {
    dotenvy::var(var)
        .ok()
        .and_then(|i| serde_json::from_str::<Vec<String>>(&i).ok())
}

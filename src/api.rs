use url::form_urlencoded::byte_serialize;

pub const API_HEROES: &str = "api/heroes";

pub fn api_heroes(base: &str) -> String {
    format!("{}/{API_HEROES}", base.trim_end_matches('/'))
}

pub fn api_hero(base: &str, id: i32) -> String {
    format!("{}/{id}", api_heroes(base))
}

pub fn api_search(base: &str, term: &str) -> String {
    let term: String = byte_serialize(term.as_bytes()).collect();
    format!("{}/?name={term}", api_heroes(base))
}

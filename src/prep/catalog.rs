/// Series-eligible columns: the header order with reserved names removed.
pub fn series_names<S: AsRef<str>>(columns: &[String], reserved: &[S]) -> Vec<String> {
    columns
        .iter()
        .filter(|col| !reserved.iter().any(|r| r.as_ref() == col.as_str()))
        .cloned()
        .collect()
}

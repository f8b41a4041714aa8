use std::path::{Path, PathBuf};

pub const SURVEY_HEADER: &str = concat!(
    "Name,Ownership,Latitude,Longitude,BasicServicesFee,",
    "DirectCremationLowestPrice,DirectCremation_Pct_Change,ImmediateBurialLowestPrice"
);

pub const SURVEY_ROWS: &[&str] = &[
    r#"Keohane,Independent ,42.25,-71.00,"$1,000","$1,995",5%,"$2,400""#,
    r#"Dolan,Independent,42.30,-71.10,"$2,450","$2,295",10%,"$2,900""#,
    r#"Mann & Rodgers,Independent,42.36,-71.06,"$3,100","$2,795",N/A,"$3,350""#,
    r#"Waring,SCI,42.40,-71.20,"$4,295","$3,995",12.5%,"$4,700""#,
    r#"Brasco,SCI,42.10,-70.90,"$3,950",,8%,"$4,250""#,
    r#"Beers & Story,FPG Beers & Story,42.05,-70.95,"$2,495","$2,495",0%,nan"#,
    r#"Carr,Carriage ,42.20,-71.30,"$3,600","$3,195",-2%,"$3,800""#,
];

pub fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut text = String::from(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    std::fs::write(&path, text).unwrap();
    path
}

pub fn write_survey_csv(dir: &Path) -> PathBuf {
    write_csv(dir, "survey.csv", SURVEY_HEADER, SURVEY_ROWS)
}

pub fn png_dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

//! Configuration sections and default config generation.

/// A named top-level section of the configuration file.
///
/// Each section documents itself: [`ConfigSection::generate_config_section`]
/// returns a commented TOML fragment that describes every key the section
/// reads. It is used for `generate-config` and for reference documentation, so
/// it must list exactly the keys the section's reader accepts.
pub trait ConfigSection {
    /// Name of the table in the configuration file.
    const SECTION: &'static str;

    /// Commented example of this section.
    fn generate_config_section() -> String;
}

const HEADER: &str = "\
# Configuration file for the homeserver.
#
# This is a TOML file. Every option below is commented out and shows its
# default or an example value. Uncomment and edit the options you need.
";

/// Assemble a full default configuration file from section fragments.
pub fn generate_config<I>(sections: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::from(HEADER);
    for section in sections {
        out.push('\n');
        out.push_str(section.trim_end());
        out.push('\n');
    }
    out
}

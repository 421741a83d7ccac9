//! Site-wide settings merged from content documents

use serde::{Deserialize, Serialize};

use super::loader::{ContentKind, ContentStore};
use super::FrontMatter;

/// Slug of the shared settings document under `settings/`
pub const GENERAL_SETTINGS: &str = "general";

/// Contact details and page texts shown across the site.
///
/// Built from configured defaults, then `settings/general.md`, then the
/// current page's own document; later sources win per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub oab: String,
    pub phone: String,
    /// Digits only, country code first, as wa.me expects
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub instagram: String,
    pub linkedin: String,
    pub facebook: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image: String,
    pub lawyer_name: String,
    pub lawyer_bio: String,
    pub lawyer_photo: String,
    /// Years of practice
    pub experience: u32,
    /// Cases handled
    pub cases: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Edson Silva Maltez".to_string(),
            oab: "OAB/SP 344.956".to_string(),
            phone: "(19) 99631-9810".to_string(),
            whatsapp: "5519996319810".to_string(),
            email: "dredsonmaltez@gmail.com".to_string(),
            address: "Rua Francisco Biancalana, 31 - sala 02 - Vila Santana, Sumaré - SP"
                .to_string(),
            instagram: "#".to_string(),
            linkedin: "#".to_string(),
            facebook: "#".to_string(),
            hero_title: "Excelência e Compromisso em Direito".to_string(),
            hero_subtitle: "Há mais de 12 anos defendendo seus direitos com ética, dedicação e soluções jurídicas eficientes.".to_string(),
            hero_image: String::new(),
            lawyer_name: "Edson Silva Maltez".to_string(),
            lawyer_bio: "Formado pela PUC Campinas, atua há 12 anos nas áreas de Direito Civil, Trabalhista e Criminal, oferecendo consultoria, assessoria e defesa técnica com ética e atenção personalizada.".to_string(),
            lawyer_photo: "/images/advogado/foto-principal.jpg".to_string(),
            experience: 12,
            cases: 350,
        }
    }
}

impl SiteSettings {
    /// Overwrite fields present (and non-empty) in `fm`.
    ///
    /// Keys use the camelCase names of the CMS (`siteName`, `heroTitle`, ...).
    /// Numbers that do not parse leave the current value in place.
    pub fn apply(&mut self, fm: &FrontMatter) {
        let text_fields: [(&str, &mut String); 15] = [
            ("siteName", &mut self.site_name),
            ("oab", &mut self.oab),
            ("phone", &mut self.phone),
            ("whatsapp", &mut self.whatsapp),
            ("email", &mut self.email),
            ("address", &mut self.address),
            ("instagram", &mut self.instagram),
            ("linkedin", &mut self.linkedin),
            ("facebook", &mut self.facebook),
            ("heroTitle", &mut self.hero_title),
            ("heroSubtitle", &mut self.hero_subtitle),
            ("heroImage", &mut self.hero_image),
            ("lawyerName", &mut self.lawyer_name),
            ("lawyerBio", &mut self.lawyer_bio),
            ("lawyerPhoto", &mut self.lawyer_photo),
        ];
        for (key, field) in text_fields {
            if let Some(value) = fm.text(key) {
                *field = value.to_string();
            }
        }

        if let Some(n) = fm.number("experience") {
            self.experience = n;
        }
        if let Some(n) = fm.number("cases") {
            self.cases = n;
        }
    }

    /// Merge defaults, the general settings document and an optional page document
    pub fn load(store: &ContentStore, defaults: &SiteSettings, page: Option<&str>) -> Self {
        let mut settings = defaults.clone();

        if let Some(doc) = store.fetch(ContentKind::Settings, GENERAL_SETTINGS).found() {
            settings.apply(&doc.metadata);
        }
        if let Some(doc) = page.and_then(|slug| store.fetch(ContentKind::Pages, slug).found()) {
            settings.apply(&doc.metadata);
        }

        settings
    }

    /// WhatsApp number with any formatting stripped
    pub fn whatsapp_digits(&self) -> String {
        self.whatsapp.chars().filter(char::is_ascii_digit).collect()
    }
}

use crate::client::RequestPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CompanyName,
    Industry,
    GeminiApiKey,
    OpenAiApiKey,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::CompanyName => "Company Name",
            FormField::Industry => "Industry",
            FormField::GeminiApiKey => "Gemini API Key",
            FormField::OpenAiApiKey => "OpenAI API Key",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FormField::GeminiApiKey | FormField::OpenAiApiKey)
    }
}

/// A focusable row of the form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormItem {
    Domain(usize),
    AddDomain,
    Field(FormField),
    Submit,
}

const TRAILING_ITEMS: [FormItem; 6] = [
    FormItem::AddDomain,
    FormItem::Field(FormField::CompanyName),
    FormItem::Field(FormField::Industry),
    FormItem::Field(FormField::GeminiApiKey),
    FormItem::Field(FormField::OpenAiApiKey),
    FormItem::Submit,
];

#[derive(Debug, Clone)]
pub struct ReportForm {
    domains: Vec<String>,
    pub(crate) company_name: String,
    pub(crate) industry: String,
    pub(crate) gemini_api_key: String,
    pub(crate) openai_api_key: String,
    pub(crate) current_field: usize,
    pub(crate) editing: bool,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportForm {
    pub fn new() -> Self {
        Self {
            domains: vec![String::new()],
            company_name: String::new(),
            industry: String::new(),
            gemini_api_key: String::new(),
            openai_api_key: String::new(),
            current_field: 0,
            editing: false,
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn set_domain(&mut self, index: usize, value: impl Into<String>) {
        if let Some(domain) = self.domains.get_mut(index) {
            *domain = value.into();
        }
    }

    pub fn add_domain(&mut self) {
        self.domains.push(String::new());
    }

    /// Removes the domain at `index`. The last remaining entry is never removed.
    pub fn remove_domain(&mut self, index: usize) -> bool {
        if !self.can_remove_domain() || index >= self.domains.len() {
            return false;
        }

        self.domains.remove(index);
        self.current_field = self.current_field.min(self.total_items() - 1);
        true
    }

    pub fn can_remove_domain(&self) -> bool {
        self.domains.len() > 1
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::CompanyName => &self.company_name,
            FormField::Industry => &self.industry,
            FormField::GeminiApiKey => &self.gemini_api_key,
            FormField::OpenAiApiKey => &self.openai_api_key,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::CompanyName => &mut self.company_name,
            FormField::Industry => &mut self.industry,
            FormField::GeminiApiKey => &mut self.gemini_api_key,
            FormField::OpenAiApiKey => &mut self.openai_api_key,
        }
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_empty(&self.gemini_api_key)
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }

    pub fn has_domain(&self) -> bool {
        self.domains.iter().any(|domain| !domain.trim().is_empty())
    }

    pub fn can_submit(&self) -> bool {
        !self.company_name.is_empty() && !self.industry.is_empty() && self.has_domain()
    }

    pub fn to_payload(&self) -> RequestPayload {
        RequestPayload {
            company_domains: self
                .domains
                .iter()
                .map(|domain| domain.trim())
                .filter(|domain| !domain.is_empty())
                .map(str::to_string)
                .collect(),
            company_name: self.company_name.clone(),
            industry: self.industry.clone(),
            gemini_api_key: self.gemini_api_key().map(str::to_string),
            openai_api_key: self.openai_api_key().map(str::to_string),
        }
    }

    pub fn total_items(&self) -> usize {
        self.domains.len() + TRAILING_ITEMS.len()
    }

    pub fn item_at(&self, index: usize) -> FormItem {
        if index < self.domains.len() {
            FormItem::Domain(index)
        } else {
            TRAILING_ITEMS
                .get(index - self.domains.len())
                .copied()
                .unwrap_or(FormItem::Submit)
        }
    }

    pub fn current_item(&self) -> FormItem {
        self.item_at(self.current_field)
    }

    pub fn is_input_item(item: FormItem) -> bool {
        matches!(item, FormItem::Domain(_) | FormItem::Field(_))
    }

    pub fn focus_next(&mut self) {
        self.current_field = (self.current_field + 1) % self.total_items();
    }

    pub fn focus_prev(&mut self) {
        if self.current_field == 0 {
            self.current_field = self.total_items() - 1;
        } else {
            self.current_field -= 1;
        }
    }

    pub fn focus_domain(&mut self, index: usize) {
        self.current_field = index.min(self.domains.len() - 1);
    }

    pub fn get_current_value_mut(&mut self) -> Option<&mut String> {
        match self.current_item() {
            FormItem::Domain(index) => self.domains.get_mut(index),
            FormItem::Field(field) => Some(self.field_mut(field)),
            FormItem::AddDomain | FormItem::Submit => None,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

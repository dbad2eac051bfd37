use crate::config::ExtractionConfig;

/// Finds the merchant name near the top of a receipt, skipping fiscal boilerplate.
#[derive(Debug, Clone)]
pub struct StoreNameResolver {
    /// Upper-cased once at construction.
    blacklist: Vec<String>,
    window: usize,
    placeholder: String,
}

impl StoreNameResolver {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            blacklist: config.header_blacklist.iter().map(|h| h.to_uppercase()).collect(),
            window: config.store_scan_window,
            placeholder: config.placeholder_store.clone(),
        }
    }

    /// First acceptable line in the scan window, or the placeholder.
    pub fn resolve(&self, lines: &[&str]) -> String {
        self.candidate(lines)
            .map(str::to_string)
            .unwrap_or_else(|| self.placeholder.clone())
    }

    fn candidate<'a>(&self, lines: &[&'a str]) -> Option<&'a str> {
        lines
            .iter()
            .copied()
            .take(self.window)
            .filter(|l| !self.is_header(l) && !is_garbage(l))
            .map(|l| l.trim_start_matches(|c: char| !c.is_ascii_alphanumeric()))
            .find(|name| name.chars().count() > 2)
    }

    fn is_header(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.blacklist.iter().any(|h| upper.contains(h.as_str()))
    }
}

/// Too short, or nothing but digits, punctuation and symbols.
fn is_garbage(line: &str) -> bool {
    line.chars().count() < 3 || !line.chars().any(|c| c.is_ascii_alphabetic() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::normalize;

    fn resolve(text: &str) -> String {
        StoreNameResolver::new(&ExtractionConfig::default()).resolve(&normalize(text))
    }

    #[test]
    fn first_line_wins() {
        assert_eq!(resolve("MERCADINHO BOM PRECO\nCNPJ 12.345.678\nTOTAL R$ 18,50"), "MERCADINHO BOM PRECO");
    }

    #[test]
    fn skips_fiscal_headers() {
        let text = "DANFE NFC-e\nDocumento Auxiliar da Nota Fiscal\nCNPJ 00.000.000/0001-00\nPADARIA SOL";
        assert_eq!(resolve(text), "PADARIA SOL");
    }

    #[test]
    fn header_match_is_case_insensitive() {
        assert_eq!(resolve("cnpj 123\nnota fiscal\nSORVETERIA POLO"), "SORVETERIA POLO");
    }

    #[test]
    fn never_returns_blacklisted_line() {
        assert_eq!(resolve("CNPJ 12.345.678/0001-99"), "Estabelecimento Comercial");
        assert_eq!(resolve("NOTA FISCAL"), "Estabelecimento Comercial");
    }

    #[test]
    fn skips_garbage_lines() {
        assert_eq!(resolve("12\n***\n12.345,00 --\nLOJA XYZ"), "LOJA XYZ");
    }

    #[test]
    fn strips_leading_punctuation() {
        assert_eq!(resolve("- McDonald's"), "McDonald's");
        assert_eq!(resolve("** Loja Centro"), "Loja Centro");
    }

    #[test]
    fn short_stripped_candidate_keeps_scanning() {
        assert_eq!(resolve("--ok\nFARMACIA POPULAR"), "FARMACIA POPULAR");
        assert_eq!(resolve("--ok"), "Estabelecimento Comercial");
    }

    #[test]
    fn only_scans_window() {
        let mut text = "00000\n".repeat(15);
        text.push_str("LOJA XYZ\n");
        assert_eq!(resolve(&text), "Estabelecimento Comercial");

        let mut text = "00000\n".repeat(14);
        text.push_str("LOJA XYZ\n");
        assert_eq!(resolve(&text), "LOJA XYZ");
    }

    #[test]
    fn empty_input_uses_placeholder() {
        assert_eq!(resolve(""), "Estabelecimento Comercial");
    }

    #[test]
    fn custom_placeholder_and_window() {
        let config = ExtractionConfig {
            placeholder_store: "Loja".into(),
            store_scan_window: 1,
            ..ExtractionConfig::default()
        };
        let resolver = StoreNameResolver::new(&config);
        assert_eq!(resolver.resolve(&["123", "LOJA XYZ"]), "Loja");
    }
}

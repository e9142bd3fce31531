//! Ticket em PDF (80 x 120 mm, mais alto quando o texto quebra em várias linhas)
//!
//! O layout é calculado primeiro como um valor simples (`TicketLayout`) e só
//! depois desenhado com printpdf. Coordenadas em milímetros, origem no canto
//! inferior esquerdo da página.

use barcoders::sym::code128::Code128;
use printpdf::image_crate::{self, DynamicImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, Rect, Rgb,
};
use qrcode::{Color as QrColor, QrCode};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

pub const PAGE_WIDTH_MM: f32 = 80.0;
pub const PAGE_HEIGHT_MM: f32 = 120.0;
pub const LOGO_BAND_MM: f32 = 24.0;

const MARGIN_MM: f32 = 6.0;
const LOGO_MAX_WIDTH_MM: f32 = 60.0;
const LOGO_MAX_HEIGHT_MM: f32 = 18.0;
const BARCODE_MAX_WIDTH_MM: f32 = 50.0;
const BARCODE_HEIGHT_MM: f32 = 10.0;
const QR_SIZE_MM: f32 = 28.0;
const PT_TO_MM: f32 = 0.3528;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

// Distâncias verticais entre as seções, de baixo para cima
const FOOTER_BASELINE_MM: f32 = 9.0;
const DETAILS_BOTTOM_MM: f32 = 18.0;
const DETAIL_FIELD_STEP_MM: f32 = 5.0;
const DETAIL_WRAP_STEP_MM: f32 = 4.0;
const QR_GAP_MM: f32 = 1.0;
const BARCODE_GAP_MM: f32 = 3.0;
const NUMBER_GAP_MM: f32 = 6.0;
const AREA_GAP_MM: f32 = 15.0;
const AREA_STEP_MM: f32 = 5.0;
const TITLE_GAP_MM: f32 = 7.0;
const TITLE_STEP_MM: f32 = 6.5;
const TOP_MARGIN_MM: f32 = 12.0;

pub const FOOTER_TEXT: &str = "Guarde este ticket até o atendimento.";

// Prefixo do conjunto B do Code128 no barcoders
const CODE128_SET_B: char = '\u{0181}';

/// Dados impressos no ticket
#[derive(Debug, Clone)]
pub struct TicketDocument {
    pub area: String,
    pub number: u32,
    pub name: String,
    pub phone: String,
    pub neighborhood: String,
    pub registered_at: String,
}

impl TicketDocument {
    pub fn qr_payload(&self) -> String {
        format!("{}|{}|{}", self.area, self.number, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size_pt: f32,
    pub style: FontStyle,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Retângulo preenchido (barra do código de barras ou módulo do QR)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub dpi: f32,
}

#[derive(Debug, Clone)]
pub struct TicketLayout {
    pub title: String,
    pub width_mm: f32,
    pub height_mm: f32,
    pub logo: Option<LogoPlacement>,
    pub lines: Vec<TextLine>,
    pub barcode: Vec<Block>,
    pub qr: Vec<Block>,
    pub qr_payload: String,
}

impl TicketLayout {
    /// Todo o texto do ticket, uma linha por item
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Largura aproximada de um texto em Helvetica (métricas AFM arredondadas)
fn text_width_mm(text: &str, size_pt: f32, style: FontStyle) -> f32 {
    let em: f32 = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'i' | 'j' | 'l' => 0.222,
            ' ' | 'f' | 't' | 'I' | '.' | ',' | ':' | '|' | '\'' => 0.278,
            'r' | '(' | ')' | '-' => 0.333,
            'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 0.5,
            'F' | 'T' | 'Z' => 0.611,
            'w' | 'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
            'G' | 'O' | 'Q' => 0.778,
            'm' | 'M' => 0.833,
            'W' => 0.944,
            c if c.is_ascii_digit() => 0.556,
            c if c.is_uppercase() => 0.667,
            _ => 0.556,
        })
        .sum();
    let bold_factor = if style == FontStyle::Bold { 1.06 } else { 1.0 };
    em * size_pt * PT_TO_MM * bold_factor
}

/// Quebra o texto em linhas que cabem em `max_mm`, sem descartar nada.
/// Palavras maiores que a linha inteira são partidas por caractere.
fn wrap_text(text: &str, size_pt: f32, style: FontStyle, max_mm: f32) -> Vec<String> {
    let fits = |candidate: &str| text_width_mm(candidate, size_pt, style) <= max_mm;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Linhas de um bloco de texto, de cima para baixo, com a última em `bottom_mm`.
/// Devolve também a linha de base da primeira linha.
fn stack_lines(
    text: &str,
    size_pt: f32,
    style: FontStyle,
    centered: bool,
    bottom_mm: f32,
    step_mm: f32,
) -> (Vec<TextLine>, f32) {
    let wrapped = wrap_text(text, size_pt, style, TEXT_WIDTH_MM);
    let count = wrapped.len();
    let lines: Vec<TextLine> = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let x_mm = if centered {
                ((PAGE_WIDTH_MM - text_width_mm(&text, size_pt, style)) / 2.0).max(MARGIN_MM / 2.0)
            } else {
                MARGIN_MM
            };
            TextLine {
                text,
                size_pt,
                style,
                x_mm,
                y_mm: bottom_mm + (count - 1 - i) as f32 * step_mm,
            }
        })
        .collect();
    let top_mm = bottom_mm + (count - 1) as f32 * step_mm;
    (lines, top_mm)
}

/// Barras do Code128, com as sequências de 1s unidas em um retângulo só
fn barcode_blocks(value: &str, bottom_mm: f32) -> AppResult<Vec<Block>> {
    let code = Code128::new(format!("{}{}", CODE128_SET_B, value))
        .map_err(|e| AppError::PdfError(format!("Code128 inválido para '{}': {}", value, e)))?;
    let modules = code.encode();
    if modules.is_empty() {
        return Ok(Vec::new());
    }

    let module_mm = (BARCODE_MAX_WIDTH_MM / modules.len() as f32).min(0.5);
    let start_x = (PAGE_WIDTH_MM - module_mm * modules.len() as f32) / 2.0;

    let mut blocks = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, bit) in modules.iter().chain(std::iter::once(&0)).enumerate() {
        match (*bit == 1, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                blocks.push(Block {
                    x_mm: start_x + start as f32 * module_mm,
                    y_mm: bottom_mm,
                    width_mm: (i - start) as f32 * module_mm,
                    height_mm: BARCODE_HEIGHT_MM,
                });
                run_start = None;
            }
            _ => {}
        }
    }
    Ok(blocks)
}

fn qr_blocks(payload: &str, bottom_mm: f32) -> AppResult<Vec<Block>> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| AppError::PdfError(format!("QR code inválido: {}", e)))?;
    let width = code.width();
    let module_mm = QR_SIZE_MM / width as f32;
    let left_mm = (PAGE_WIDTH_MM - QR_SIZE_MM) / 2.0;
    let top_mm = bottom_mm + QR_SIZE_MM;

    Ok(code
        .to_colors()
        .into_iter()
        .enumerate()
        .filter(|(_, color)| *color == QrColor::Dark)
        .map(|(i, _)| {
            let (col, row) = (i % width, i / width);
            Block {
                x_mm: left_mm + col as f32 * module_mm,
                y_mm: top_mm - (row + 1) as f32 * module_mm,
                width_mm: module_mm,
                height_mm: module_mm,
            }
        })
        .collect())
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn pdf_error(err: impl std::fmt::Display) -> AppError {
    AppError::PdfError(err.to_string())
}

pub struct TicketPdfRenderer {
    title: String,
    logo: Option<DynamicImage>,
}

impl TicketPdfRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), logo: None }
    }

    /// Carrega o logo do disco; se não der, o ticket sai sem logo
    pub fn with_logo_path(self, path: Option<&str>) -> Self {
        let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
            return self;
        };

        match std::fs::read(path) {
            Ok(bytes) => self.with_logo_bytes(&bytes),
            Err(e) => {
                log_warning(&format!("⚠️ Logo '{}' não pôde ser lido: {}", path, e));
                self
            }
        }
    }

    pub fn with_logo_bytes(mut self, bytes: &[u8]) -> Self {
        match image_crate::load_from_memory(bytes) {
            Ok(img) => {
                // Sem canal alfa: o PDF recebe um RGB simples
                self.logo = Some(DynamicImage::ImageRgb8(img.to_rgb8()));
            }
            Err(e) => log_warning(&format!("⚠️ Logo ignorado, imagem inválida: {}", e)),
        }
        self
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    fn logo_placement(&self, content_height_mm: f32) -> Option<LogoPlacement> {
        let logo = self.logo.as_ref()?;
        let rgb = logo.as_rgb8()?;
        let (px_w, px_h) = (rgb.width() as f32, rgb.height() as f32);
        if px_w == 0.0 || px_h == 0.0 {
            return None;
        }

        let dpi = (px_w * 25.4 / LOGO_MAX_WIDTH_MM).max(px_h * 25.4 / LOGO_MAX_HEIGHT_MM);
        let width_mm = px_w * 25.4 / dpi;
        let height_mm = px_h * 25.4 / dpi;

        Some(LogoPlacement {
            x_mm: (PAGE_WIDTH_MM - width_mm) / 2.0,
            y_mm: content_height_mm + (LOGO_BAND_MM - height_mm) / 2.0,
            width_mm,
            height_mm,
            dpi,
        })
    }

    /// Monta o ticket de baixo para cima. Textos longos quebram em mais
    /// linhas e a página cresce acima de 120 mm quando precisa.
    pub fn layout(&self, doc: &TicketDocument) -> AppResult<TicketLayout> {
        let number = doc.number.to_string();
        let qr_payload = doc.qr_payload();

        let (footer, _) = stack_lines(
            FOOTER_TEXT,
            8.0,
            FontStyle::Italic,
            true,
            FOOTER_BASELINE_MM,
            DETAIL_WRAP_STEP_MM,
        );

        let fields = [
            format!("Nome: {}", doc.name),
            format!("Telefone: {}", doc.phone),
            format!("Bairro: {}", doc.neighborhood),
            format!("Registro: {}", doc.registered_at),
        ];
        let mut details = Vec::new();
        let mut cursor = DETAILS_BOTTOM_MM;
        for field in fields.iter().rev() {
            let (lines, top) = stack_lines(
                field,
                9.0,
                FontStyle::Regular,
                false,
                cursor,
                DETAIL_WRAP_STEP_MM,
            );
            details.splice(0..0, lines);
            cursor = top + DETAIL_FIELD_STEP_MM;
        }

        let qr_bottom = cursor + QR_GAP_MM;
        let barcode_bottom = qr_bottom + QR_SIZE_MM + BARCODE_GAP_MM;
        let number_baseline = barcode_bottom + BARCODE_HEIGHT_MM + NUMBER_GAP_MM;
        let (number_line, _) = stack_lines(&number, 40.0, FontStyle::Bold, true, number_baseline, 0.0);

        let (area, area_top) = stack_lines(
            &doc.area,
            12.0,
            FontStyle::Regular,
            true,
            number_baseline + AREA_GAP_MM,
            AREA_STEP_MM,
        );
        let (title, title_top) = stack_lines(
            &self.title,
            16.0,
            FontStyle::Bold,
            true,
            area_top + TITLE_GAP_MM,
            TITLE_STEP_MM,
        );

        let content_height = (title_top + TOP_MARGIN_MM).max(PAGE_HEIGHT_MM);
        let logo = self.logo_placement(content_height);
        let height_mm = if logo.is_some() {
            content_height + LOGO_BAND_MM
        } else {
            content_height
        };

        let lines = title
            .into_iter()
            .chain(area)
            .chain(number_line)
            .chain(details)
            .chain(footer)
            .collect();

        Ok(TicketLayout {
            title: format!("Senha {} - {}", number, doc.area),
            width_mm: PAGE_WIDTH_MM,
            height_mm,
            logo,
            lines,
            barcode: barcode_blocks(&number, barcode_bottom)?,
            qr: qr_blocks(&qr_payload, qr_bottom)?,
            qr_payload,
        })
    }

    pub fn render(&self, doc: &TicketDocument) -> AppResult<Vec<u8>> {
        let layout = self.layout(doc)?;

        let (pdf, page, layer) = PdfDocument::new(
            layout.title.as_str(),
            Mm(layout.width_mm),
            Mm(layout.height_mm),
            "Ticket",
        );
        let layer = pdf.get_page(page).get_layer(layer);

        let regular = pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let italic = pdf.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_error)?;
        if let (Some(image), Some(placement)) = (self.logo.as_ref(), layout.logo) {
            Image::from_dynamic_image(image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(placement.x_mm)),
                    translate_y: Some(Mm(placement.y_mm)),
                    dpi: Some(placement.dpi),
                    ..Default::default()
                },
            );
        }

        layer.set_fill_color(black());

        for line in &layout.lines {
            let font: &IndirectFontRef = match line.style {
                FontStyle::Regular => &regular,
                FontStyle::Bold => &bold,
                FontStyle::Italic => &italic,
            };
            layer.use_text(line.text.clone(), line.size_pt, Mm(line.x_mm), Mm(line.y_mm), font);
        }

        for block in layout.barcode.iter().chain(layout.qr.iter()) {
            layer.add_rect(Rect::new(
                Mm(block.x_mm),
                Mm(block.y_mm),
                Mm(block.x_mm + block.width_mm),
                Mm(block.y_mm + block.height_mm),
            ));
        }

        pdf.save_to_bytes().map_err(pdf_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> TicketDocument {
        TicketDocument {
            area: "Odontologia".to_string(),
            number: 42,
            name: "MARIA DA SILVA".to_string(),
            phone: "(92) 98123-1234".to_string(),
            neighborhood: "Centro".to_string(),
            registered_at: "10/03/2025 11:04:05".to_string(),
        }
    }

    #[test]
    fn test_layout_contains_ticket_data() {
        let layout = TicketPdfRenderer::new("Distribuidor de Senhas")
            .layout(&document())
            .unwrap();
        let text = layout.text();

        assert!(text.contains("Distribuidor de Senhas"));
        assert!(text.contains("Odontologia"));
        assert!(text.contains("42"));
        assert!(text.contains("Nome: MARIA DA SILVA"));
        assert!(text.contains("Telefone: (92) 98123-1234"));
        assert!(text.contains(FOOTER_TEXT));
        assert_eq!(layout.qr_payload, "Odontologia|42|MARIA DA SILVA");
        assert_eq!(layout.height_mm, PAGE_HEIGHT_MM);
        assert!(layout.logo.is_none());
    }

    #[test]
    fn test_barcode_and_qr_fit_the_page() {
        let layout = TicketPdfRenderer::new("Distribuidor de Senhas")
            .layout(&document())
            .unwrap();

        assert!(!layout.barcode.is_empty());
        assert!(!layout.qr.is_empty());
        for block in layout.barcode.iter().chain(layout.qr.iter()) {
            assert!(block.x_mm >= 0.0 && block.x_mm + block.width_mm <= PAGE_WIDTH_MM);
            assert!(block.y_mm >= 0.0 && block.y_mm + block.height_mm <= PAGE_HEIGHT_MM);
        }
    }

    #[test]
    fn test_default_positions() {
        let layout = TicketPdfRenderer::new("Distribuidor de Senhas")
            .layout(&document())
            .unwrap();
        let y_of = |prefix: &str| {
            layout
                .lines
                .iter()
                .find(|l| l.text.starts_with(prefix))
                .map(|l| l.y_mm)
                .unwrap()
        };

        assert_eq!(y_of("Distribuidor"), 108.0);
        assert_eq!(y_of("Odontologia"), 101.0);
        assert_eq!(y_of("42"), 86.0);
        assert_eq!(y_of("Nome:"), 33.0);
        assert_eq!(y_of("Registro:"), 18.0);
        assert_eq!(y_of("Guarde"), 9.0);
    }

    #[test]
    fn test_long_name_and_area_wrap_without_losing_text() {
        let mut doc = document();
        doc.name = "MARIA APARECIDA DOS SANTOS FERREIRA DA SILVA CAVALCANTE DE OLIVEIRA NASCIMENTO BARBOSA"
            .chars()
            .take(80)
            .collect();
        doc.area = "Atendimento Jurídico e Assistência Social".to_string();
        assert_eq!(doc.name.chars().count(), 80);

        let layout = TicketPdfRenderer::new("Distribuidor de Senhas").layout(&doc).unwrap();
        let joined = layout.text().replace('\n', " ");

        assert!(joined.contains(&format!("Nome: {}", doc.name)));
        assert!(joined.contains(&doc.area));
        assert!(layout.lines.iter().filter(|l| l.text.starts_with("Nome:")).count() == 1);
        assert!(layout.lines.len() > document_line_count());

        for line in &layout.lines {
            assert!(!line.text.ends_with("..."), "{}", line.text);
            assert!(
                text_width_mm(&line.text, line.size_pt, line.style) <= TEXT_WIDTH_MM,
                "{}",
                line.text
            );
            assert!(line.y_mm > 0.0 && line.y_mm < layout.height_mm);
        }

        // O QR fica acima da última linha do nome
        let name_top = layout
            .lines
            .iter()
            .find(|l| l.text.starts_with("Nome:"))
            .map(|l| l.y_mm)
            .unwrap();
        let qr_bottom = layout.qr.iter().map(|b| b.y_mm).fold(f32::MAX, f32::min);
        assert!(qr_bottom > name_top);
        for block in layout.barcode.iter().chain(layout.qr.iter()) {
            assert!(block.y_mm + block.height_mm <= layout.height_mm);
        }
    }

    fn document_line_count() -> usize {
        TicketPdfRenderer::new("Distribuidor de Senhas")
            .layout(&document())
            .unwrap()
            .lines
            .len()
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let word = "X".repeat(60);
        let lines = wrap_text(&word, 9.0, FontStyle::Regular, TEXT_WIDTH_MM);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        assert_eq!(wrap_text("", 9.0, FontStyle::Regular, TEXT_WIDTH_MM), vec![String::new()]);
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = TicketPdfRenderer::new("Distribuidor de Senhas")
            .render(&document())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_invalid_logo_is_skipped() {
        let renderer = TicketPdfRenderer::new("Distribuidor de Senhas")
            .with_logo_bytes(b"isto nao e uma imagem")
            .with_logo_path(Some("/caminho/inexistente/logo.png"));
        assert!(!renderer.has_logo());
        assert!(renderer.render(&document()).is_ok());
    }

    #[test]
    fn test_logo_grows_the_page() {
        let mut png = Vec::new();
        let img = image_crate::RgbImage::from_pixel(40, 20, image_crate::Rgb([200, 30, 30]));
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image_crate::ImageOutputFormat::Png)
            .unwrap();

        let renderer = TicketPdfRenderer::new("Distribuidor de Senhas").with_logo_bytes(&png);
        assert!(renderer.has_logo());

        let layout = renderer.layout(&document()).unwrap();
        let logo = layout.logo.unwrap();
        assert_eq!(layout.height_mm, PAGE_HEIGHT_MM + LOGO_BAND_MM);
        assert!(logo.width_mm <= LOGO_MAX_WIDTH_MM + 0.01);
        assert!(logo.height_mm <= LOGO_MAX_HEIGHT_MM + 0.01);
        assert!(logo.y_mm >= PAGE_HEIGHT_MM);

        assert!(renderer.render(&document()).unwrap().starts_with(b"%PDF"));
    }
}

//! Páginas HTML do distribuidor
//!
//! HTML gerado com `format!`, sem template engine. Todo valor vindo da
//! planilha ou do usuário passa por `escape_html`.

use axum::response::Html;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::models::{Area, IssuedTicket, PrintOutcome, TicketForm, TICKET_HEADERS};
use crate::utils::escape_html;

const PAGE_TITLE: &str = "🎟️ Distribuidor de Senhas - Evento";

const CSS: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
           max-width: 720px; margin: 40px auto; padding: 20px; background: #f5f5f5; color: #222; }
    .container { background: white; padding: 30px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
    h1 { margin-top: 0; }
    .caption { color: #666; font-size: 13px; }
    .caption code { background: #eee; padding: 2px 6px; border-radius: 4px; }
    details { background: #f8f9fa; border: 1px solid #ddd; border-radius: 8px; padding: 12px 16px; margin: 16px 0; }
    summary { cursor: pointer; font-weight: bold; }
    label { display: block; margin-top: 14px; font-weight: 600; }
    input, select { width: 100%; padding: 10px; margin-top: 6px; border: 1px solid #ccc; border-radius: 6px;
                    font-size: 15px; box-sizing: border-box; }
    button { margin-top: 20px; background: #28a745; color: white; padding: 12px 24px; border: none;
             border-radius: 6px; cursor: pointer; font-size: 15px; font-weight: bold; }
    button:hover { background: #218838; }
    .error { background: #f8d7da; border: 2px solid #dc3545; padding: 14px; border-radius: 8px; margin: 16px 0; }
    .warning { background: #fff3cd; border: 2px solid #ffc107; padding: 14px; border-radius: 8px; margin: 16px 0; }
    .info { background: #d1ecf1; border: 2px solid #17a2b8; padding: 14px; border-radius: 8px; margin: 16px 0; }
    .success { background: #d4edda; border: 2px solid #28a745; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
    .senha { font-size: 64px; font-weight: bold; text-align: center; margin: 10px 0; }
    .download { display: inline-block; background: #007bff; color: white; padding: 12px 24px;
                border-radius: 6px; text-decoration: none; font-weight: bold; }
    .back { display: inline-block; margin-left: 12px; }
"#;

fn render_page(content: String) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        {content}
    </div>
</body>
</html>"#,
        title = PAGE_TITLE,
        css = CSS,
        content = content
    ))
}

fn help_section() -> String {
    format!(
        r#"<details>
            <summary>Como funciona?</summary>
            <ol>
                <li>A aba <strong>Nomes</strong> da planilha deve listar todas as áreas, com a coluna <strong>Ativa</strong> marcada para as que devem aparecer aqui.</li>
                <li>Escolha a <strong>Área</strong> (apenas as ativas são exibidas), preencha <strong>Nome</strong>, <strong>Telefone</strong> e <strong>Bairro</strong>.</li>
                <li>Clique em <strong>Gerar senha e salvar</strong>. O sistema grava na aba da área com as colunas <code>{}</code> (a última em branco), cria a <strong>senha sequencial</strong> da planilha e gera um <strong>PDF</strong> para impressão.</li>
            </ol>
        </details>"#,
        TICKET_HEADERS.join(" | ")
    )
}

fn options(values: &[&str], selected: &str) -> String {
    std::iter::once("")
        .chain(values.iter().copied())
        .map(|v| {
            let escaped = escape_html(v);
            let sel = if !v.is_empty() && v == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, escaped, sel)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dados para montar o formulário
pub struct FormPage<'a> {
    pub spreadsheet_id: &'a str,
    pub areas: &'a [Area],
    pub neighborhoods: &'a [String],
    pub sheet_error: Option<String>,
    pub neighborhoods_error: Option<String>,
    pub form_error: Option<String>,
    pub previous: Option<&'a TicketForm>,
}

pub fn render_form_page(page: &FormPage<'_>) -> Html<String> {
    let mut content = format!(
        r#"<p class="caption">Planilha conectada: <code>{}</code></p>{}"#,
        escape_html(page.spreadsheet_id),
        help_section()
    );

    if let Some(err) = &page.sheet_error {
        content.push_str(&format!(
            r#"<div class="error">⚠️ Não foi possível ler a planilha: {}</div>"#,
            escape_html(err)
        ));
    }

    if page.areas.is_empty() {
        content.push_str(
            r#"<div class="warning">Nenhuma área ativa encontrada na aba 'Nomes'. Verifique a planilha/credenciais.</div>"#,
        );
        return render_page(content);
    }

    if let Some(err) = &page.form_error {
        content.push_str(&format!(r#"<div class="error">{}</div>"#, escape_html(err)));
    }

    let empty = TicketForm::default();
    let previous = page.previous.unwrap_or(&empty);

    let area_names: Vec<&str> = page.areas.iter().map(|a| a.area.as_str()).collect();

    let neighborhood_field = if page.neighborhoods.is_empty() {
        let notice = match &page.neighborhoods_error {
            Some(err) => format!("Não foi possível ler a aba 'Bairro' ({}).", escape_html(err)),
            None => "Lista de bairros não encontrada na aba 'Bairro'.".to_string(),
        };
        format!(
            r#"<div class="info">{} Informe manualmente abaixo ou verifique a planilha.</div>
            <input id="bairro" name="bairro" maxlength="80" value="{}">"#,
            notice,
            escape_html(&previous.bairro)
        )
    } else {
        let names: Vec<&str> = page.neighborhoods.iter().map(String::as_str).collect();
        format!(
            r#"<select id="bairro" name="bairro">{}</select>"#,
            options(&names, &previous.bairro)
        )
    };

    content.push_str(&format!(
        r#"<form method="post" action="/senhas">
            <label for="area">Área / Setor</label>
            <select id="area" name="area" required>{areas}</select>

            <label for="nome">Nome</label>
            <input id="nome" name="nome" maxlength="80" required value="{nome}">

            <label for="telefone">Telefone</label>
            <input id="telefone" name="telefone" maxlength="30" placeholder="(00) 00000-0000" value="{telefone}">

            <label for="bairro">Bairro</label>
            {bairro}

            <button type="submit">✅ Gerar senha e salvar</button>
        </form>"#,
        areas = options(&area_names, &previous.area),
        nome = escape_html(&previous.nome),
        telefone = escape_html(&previous.telefone),
        bairro = neighborhood_field
    ));

    render_page(content)
}

/// Link `data:` com o PDF embutido
pub fn pdf_data_uri(pdf: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(pdf))
}

pub fn render_result_page(ticket: &IssuedTicket) -> Html<String> {
    let print_notice = match &ticket.print {
        PrintOutcome::Printed => {
            r#"<div class="info">🖨️ Ticket enviado para a impressora.</div>"#.to_string()
        }
        PrintOutcome::NotConfigured => String::new(),
        PrintOutcome::Failed(reason) => format!(
            r#"<div class="warning">⚠️ Não foi possível imprimir automaticamente ({}). Baixe o PDF abaixo.</div>"#,
            escape_html(reason)
        ),
    };

    let content = format!(
        r#"<div class="success">
            <p>Senha gerada para a área <strong>{area}</strong> às {registro}.</p>
            <div class="senha">{senha}</div>
            <p>{nome}</p>
        </div>
        {print_notice}
        <p>
            <a class="download" download="{arquivo}" href="{href}">⬇️ Baixar PDF da senha</a>
            <a class="back" href="/">Nova senha</a>
        </p>"#,
        area = escape_html(&ticket.area),
        registro = escape_html(&ticket.registered_at),
        senha = ticket.number,
        nome = escape_html(&ticket.name),
        print_notice = print_notice,
        arquivo = escape_html(&ticket.file_name),
        href = pdf_data_uri(&ticket.pdf),
    );

    render_page(content)
}

pub fn render_error_page(message: &str) -> Html<String> {
    render_page(format!(
        r#"<div class="error">Falha ao gerar senha: {}</div>
        <p><a href="/">Voltar</a></p>"#,
        escape_html(message)
    ))
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 服务端渲染的HTML页面

use html_escape::encode_text;

use crate::domain::models::bill::Bill;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
    li{margin-bottom:1rem}#chat p{margin:.25rem 0}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
        <title>{}</title><style>{}</style></head><body>{}</body></html>",
        encode_text(title),
        STYLE,
        body
    )
}

fn bill_list(bills: &[Bill]) -> String {
    if bills.is_empty() {
        return "<p>No bills have been collected yet.</p>".to_string();
    }
    let items = bills
        .iter()
        .map(|bill| {
            format!(
                "<li><h3>{}</h3><p>{}</p></li>",
                encode_text(&bill.name),
                encode_text(&bill.summary)
            )
        })
        .collect::<String>();
    format!("<ul class=\"bills\">{}</ul>", items)
}

/// 首页：简报内容和订阅表单
pub fn index_page(bills: &[Bill], year: i32) -> String {
    let body = format!(
        "<h1>AI Policy Newsletter</h1>{}\
        <form method=\"post\" action=\"/subscribe\">\
        <input type=\"email\" name=\"email\" placeholder=\"you@example.com\" required>\
        <button type=\"submit\">Subscribe</button></form>\
        <footer>&copy; {} BillBrief</footer>",
        bill_list(bills),
        year
    );
    layout("AI Policy Newsletter", &body)
}

/// 问答页：法案列表和提问框
pub fn interact_page(bills: &[Bill]) -> String {
    let body = format!(
        "<h1>Ask about AI policy</h1>{}\
        <div id=\"chat\"></div>\
        <form id=\"ask\"><input id=\"message\" name=\"message\" autocomplete=\"off\">\
        <button type=\"submit\">Ask</button></form>\
        <script>{}</script>",
        bill_list(bills),
        CHAT_SCRIPT
    );
    layout("Ask about AI policy", &body)
}

const CHAT_SCRIPT: &str = r#"
document.getElementById('ask').addEventListener('submit', async (event) => {
  event.preventDefault();
  const input = document.getElementById('message');
  const chat = document.getElementById('chat');
  const question = document.createElement('p');
  question.textContent = 'You: ' + input.value;
  chat.appendChild(question);
  const response = await fetch('/interact_json', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ message: input.value }),
  });
  const answer = document.createElement('p');
  answer.textContent = 'Bot: ' + (response.ok ? await response.json() : 'Something went wrong.');
  chat.appendChild(answer);
  input.value = '';
});
"#;

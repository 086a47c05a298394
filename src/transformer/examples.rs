//! Code-sample synthesis for the four documented client languages.

use crate::models::{BodyValue, CodeExample, CodeLanguage};

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

/// Only these methods carry a request body in the samples.
pub(crate) fn method_has_body(method: &str) -> bool {
    matches!(method, "POST" | "PUT" | "PATCH")
}

pub fn generate_code_examples(
    method: &str,
    url: &str,
    body: Option<&BodyValue>,
) -> Vec<CodeExample> {
    let body = body.filter(|_| method_has_body(method));
    vec![
        CodeExample {
            language: CodeLanguage::Curl,
            code: curl_example(method, url, body),
        },
        CodeExample {
            language: CodeLanguage::Javascript,
            code: javascript_example(method, url, body),
        },
        CodeExample {
            language: CodeLanguage::Python,
            code: python_example(method, url, body),
        },
        CodeExample {
            language: CodeLanguage::Php,
            code: php_example(method, url, body),
        },
    ]
}

fn curl_example(method: &str, url: &str, body: Option<&BodyValue>) -> String {
    let mut code = format!("curl -X {method} \"{url}\" \\\n");
    code.push_str("  -H \"Content-Type: application/json\" \\\n");
    code.push_str(&format!("  -H \"x-api-key: {PLACEHOLDER_API_KEY}\""));

    if let Some(body) = body {
        code.push_str(&format!(" \\\n  -d '{}'", body.to_pretty_json()));
    }

    code
}

fn javascript_example(method: &str, url: &str, body: Option<&BodyValue>) -> String {
    let mut code = format!("const response = await fetch(\"{url}\", {{\n");
    code.push_str(&format!("  method: \"{method}\",\n"));
    code.push_str("  headers: {\n");
    code.push_str("    \"Content-Type\": \"application/json\",\n");
    code.push_str(&format!("    \"x-api-key\": \"{PLACEHOLDER_API_KEY}\"\n"));
    code.push_str("  }");

    if let Some(body) = body {
        code.push_str(&format!(",\n  body: JSON.stringify({})", body.to_pretty_json()));
    }

    code.push_str("\n});\n\n");
    code.push_str("const data = await response.json();\n");
    code.push_str("console.log(data);");

    code
}

fn python_example(method: &str, url: &str, body: Option<&BodyValue>) -> String {
    let mut code = String::from("import requests\n\n");
    code.push_str(&format!("url = \"{url}\"\n"));
    code.push_str("headers = {\n");
    code.push_str("    \"Content-Type\": \"application/json\",\n");
    code.push_str(&format!("    \"x-api-key\": \"{PLACEHOLDER_API_KEY}\"\n"));
    code.push_str("}\n");

    let method_fn = method.to_lowercase();
    match body {
        Some(body) => {
            code.push_str(&format!("data = {}\n\n", body.to_pretty_json()));
            code.push_str(&format!(
                "response = requests.{method_fn}(url, headers=headers, json=data)\n"
            ));
        }
        None => {
            code.push_str(&format!(
                "\nresponse = requests.{method_fn}(url, headers=headers)\n"
            ));
        }
    }

    code.push_str("print(response.json())");

    code
}

fn php_example(method: &str, url: &str, body: Option<&BodyValue>) -> String {
    let mut code = String::from("<?php\n\n");
    code.push_str(&format!("$url = \"{url}\";\n"));
    code.push_str("$headers = [\n");
    code.push_str("    \"Content-Type: application/json\",\n");
    code.push_str(&format!("    \"x-api-key: {PLACEHOLDER_API_KEY}\"\n"));
    code.push_str("];\n\n");

    match body {
        Some(body) => {
            code.push_str(&format!("$data = {};\n\n", body.to_pretty_json()));
            code.push_str("$ch = curl_init($url);\n");
            code.push_str(&format!(
                "curl_setopt($ch, CURLOPT_CUSTOMREQUEST, \"{method}\");\n"
            ));
            code.push_str("curl_setopt($ch, CURLOPT_POSTFIELDS, json_encode($data));\n");
        }
        None => {
            code.push_str("$ch = curl_init($url);\n");
            code.push_str(&format!(
                "curl_setopt($ch, CURLOPT_CUSTOMREQUEST, \"{method}\");\n"
            ));
        }
    }

    code.push_str("curl_setopt($ch, CURLOPT_HTTPHEADER, $headers);\n");
    code.push_str("curl_setopt($ch, CURLOPT_RETURNTRANSFER, true);\n\n");
    code.push_str("$response = curl_exec($ch);\n");
    code.push_str("curl_close($ch);\n\n");
    code.push_str("echo $response;\n");
    code.push_str("?>");

    code
}

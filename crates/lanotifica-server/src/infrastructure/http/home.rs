//! The pairing page served at `/`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const QR_PLACEHOLDER: &str = "{{QR_CODE}}";

const HOME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LaNotifica</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #16213e;
            color: #e0e0e0;
            display: flex;
            justify-content: center;
            padding: 40px 20px;
        }
        .container { max-width: 480px; text-align: center; }
        .qr { background: white; border-radius: 16px; padding: 20px; display: inline-block; }
        .qr img { display: block; width: 256px; height: 256px; }
        ol { text-align: left; line-height: 1.6; }
        .note { margin-top: 24px; font-size: 0.9rem; color: #aaa; }
    </style>
</head>
<body>
    <div class="container">
        <h1>LaNotifica</h1>
        <p>Forward Android notifications to your desktop</p>
        <div class="qr">
            <img src="data:image/png;base64,{{QR_CODE}}" alt="Pairing QR code">
        </div>
        <ol>
            <li>Install the <strong>LaNotifica</strong> app on your Android device</li>
            <li>Open the app and tap <strong>Scan QR Code</strong></li>
            <li>Point your camera at the QR code above</li>
            <li>Grant <strong>Notification Access</strong> permission</li>
            <li>Enable the <strong>Forward Notifications</strong> switch</li>
        </ol>
        <p class="note">
            The QR code contains the authentication token and the server's
            certificate fingerprint. Keep it private and don't share it.
        </p>
    </div>
</body>
</html>
"#;

/// Renders the page around `qr_png`.  An empty image yields a page with an
/// empty data URI rather than an error.
pub fn render_home_page(qr_png: &[u8]) -> String {
    HOME_TEMPLATE.replace(QR_PLACEHOLDER, &STANDARD.encode(qr_png))
}

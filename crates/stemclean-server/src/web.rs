//! Static landing page

/// Single-page UI. The form drives GET /process and renders either the
/// returned download link or the error message.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Stem Cleaner</title>
<style>
  body { font-family: sans-serif; background: #f4f4f4; margin: 0; }
  .wrap { max-width: 480px; margin: 4rem auto; background: #fff; padding: 2rem;
          border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,.15); }
  h1 { font-size: 1.4rem; margin-top: 0; }
  input, select, button { width: 100%; box-sizing: border-box; padding: .6rem;
                          margin-top: .8rem; font-size: 1rem; }
  button { background: #2563eb; color: #fff; border: 0; border-radius: 4px; cursor: pointer; }
  button:disabled { background: #9ca3af; }
  .error { color: #b91c1c; }
  #result { margin-top: 1.2rem; }
</style>
</head>
<body>
<div class="wrap">
  <h1>Stem Cleaner</h1>
  <p>Extract the vocal or instrumental stem from a video, with silence removed.</p>
  <input id="url" type="text" placeholder="Video URL">
  <input id="name" type="text" placeholder="File name (optional)">
  <select id="type">
    <option value="vocals">Vocals</option>
    <option value="music">Instrumental</option>
  </select>
  <button id="go" onclick="process()">Extract</button>
  <div id="result"></div>
</div>
<script>
async function process() {
  const url = document.getElementById('url').value;
  const name = document.getElementById('name').value || 'audio';
  const type = document.getElementById('type').value;
  const result = document.getElementById('result');
  const button = document.getElementById('go');

  if (!url) {
    result.innerHTML = '<p class="error">Enter a video URL first.</p>';
    return;
  }

  button.disabled = true;
  result.innerHTML = '<p>Processing, this can take a few minutes&hellip;</p>';

  try {
    const res = await fetch(`/process?youtube_url=${encodeURIComponent(url)}&file_name=${encodeURIComponent(name)}&file_type=${encodeURIComponent(type)}`);
    const data = await res.json();
    if (data.error) {
      result.innerHTML = `<p class="error">${data.error}</p>`;
    } else {
      result.innerHTML = `<a href="${data.file}" download>Download ${type}.wav</a>`;
    }
  } catch (err) {
    result.innerHTML = `<p class="error">${err}</p>`;
  } finally {
    button.disabled = false;
  }
}
</script>
</body>
</html>
"##;
